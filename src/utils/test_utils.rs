//! Test fixtures: sample modules and a ready-to-use diamond.

use crate::config::DiamondConfig;
use crate::core::context::CallContext;
use crate::core::diamond::Diamond;
use crate::core::errors::CallError;
use crate::module::Module;
use crate::module::builtin::{StandardModules, deploy_standard, standard_cuts};
use crate::module::calldata::{encode_call, encode_return};
use crate::module::host::ModuleHost;
use crate::storage::namespace::Namespace;
use crate::storage::state::{StateRead, TypedState, TypedStateMut};
use crate::types::address::Address;
use crate::types::selector::Selector;
use bytes::Bytes;
use std::sync::LazyLock;

static COUNTER_STORAGE: LazyLock<Namespace> =
    LazyLock::new(|| Namespace::new("test.counter.storage"));

pub const COUNTER_SIGNATURES: [&str; 7] = [
    "increment()",
    "count()",
    "incrementTwice()",
    "incrementThenRevert()",
    "tryNested()",
    "whoami()",
    "recurse()",
];

pub fn sel(signature: &str) -> Selector {
    Selector::from_signature(signature)
}

/// Calldata for a function without arguments.
pub fn call0(signature: &str) -> Vec<u8> {
    encode_call(sel(signature), &())
}

pub fn counter_selectors() -> Vec<Selector> {
    COUNTER_SIGNATURES.iter().map(|s| sel(s)).collect()
}

pub fn read_count<S: StateRead + ?Sized>(state: &S) -> u64 {
    state.read(COUNTER_STORAGE.slot("count")).unwrap_or(0)
}

/// Counter kept in the diamond's state; `step` distinguishes versions.
pub struct CounterModule {
    step: u64,
}

impl CounterModule {
    pub fn v1() -> Self {
        Self { step: 1 }
    }

    pub fn v2() -> Self {
        Self { step: 10 }
    }

    fn increment(&self, ctx: &mut CallContext<'_>) -> u64 {
        let next = read_count(ctx.state_ref()) + self.step;
        ctx.state().write(COUNTER_STORAGE.slot("count"), &next);
        next
    }
}

impl Module for CounterModule {
    fn name(&self) -> &str {
        if self.step == 1 { "counter" } else { "counter-v2" }
    }

    fn selectors(&self) -> Vec<Selector> {
        counter_selectors()
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        let selector = Selector::from_calldata(calldata);
        if selector == sel("increment()") {
            Ok(encode_return(&self.increment(ctx)))
        } else if selector == sel("count()") {
            Ok(encode_return(&read_count(ctx.state_ref())))
        } else if selector == sel("incrementTwice()") {
            ctx.call_self(&call0("increment()"))?;
            ctx.call_self(&call0("increment()"))?;
            Ok(encode_return(&read_count(ctx.state_ref())))
        } else if selector == sel("incrementThenRevert()") {
            self.increment(ctx);
            Err(CallError::Revert(Bytes::from_static(b"boom")))
        } else if selector == sel("tryNested()") {
            self.increment(ctx);
            let _ = ctx.call_self(&call0("incrementThenRevert()"));
            Ok(encode_return(&read_count(ctx.state_ref())))
        } else if selector == sel("whoami()") {
            Ok(encode_return(&(ctx.sender(), ctx.this(), ctx.value())))
        } else if selector == sel("recurse()") {
            ctx.call_self(&call0("recurse()"))
        } else {
            Err(CallError::FunctionNotFound(selector))
        }
    }
}

/// Returns its calldata unchanged, whatever the selector.
pub struct EchoModule;

impl Module for EchoModule {
    fn name(&self) -> &str {
        "echo"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![]
    }

    fn invoke(&self, _ctx: &mut CallContext<'_>, calldata: &[u8]) -> Result<Bytes, CallError> {
        Ok(Bytes::copy_from_slice(calldata))
    }
}

/// Init target that writes to state and then fails.
pub struct RevertingInit;

impl Module for RevertingInit {
    fn name(&self) -> &str {
        "reverting-init"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![]
    }

    fn invoke(&self, ctx: &mut CallContext<'_>, _calldata: &[u8]) -> Result<Bytes, CallError> {
        ctx.state().write(COUNTER_STORAGE.slot("count"), &99u64);
        Err(CallError::Revert(Bytes::from_static(b"init failed")))
    }
}

pub struct Fixture {
    pub diamond: Diamond,
    pub owner: Address,
    pub modules: StandardModules,
    pub counter: Address,
    pub counter_v2: Address,
    pub echo: Address,
    pub reverting_init: Address,
}

/// Diamond with the standard modules routed and sample modules deployed
/// (but not routed).
pub fn setup() -> Fixture {
    setup_with(DiamondConfig::default())
}

pub fn setup_with(config: DiamondConfig) -> Fixture {
    let mut host = ModuleHost::new();
    let modules = deploy_standard(&mut host);
    let counter = host.deploy(CounterModule::v1());
    let counter_v2 = host.deploy(CounterModule::v2());
    let echo = host.deploy(EchoModule);
    let reverting_init = host.deploy(RevertingInit);

    let owner = Address::from_label("owner");
    let mut diamond = Diamond::new(owner, host, modules.cut, config).unwrap();
    diamond
        .diamond_cut(owner, &standard_cuts(&modules), None, &[])
        .unwrap();
    diamond.drain_events();

    Fixture {
        diamond,
        owner,
        modules,
        counter,
        counter_v2,
        echo,
        reverting_init,
    }
}
