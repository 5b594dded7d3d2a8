//! The dispatcher: a single address whose functions are served by modules.
//!
//! A [`Diamond`] owns the durable state store, the code table and the
//! committed event log. Every external entry point runs inside one overlay,
//! so a call either commits all of its writes and events or none of them.

use crate::config::DiamondConfig;
use crate::core::context::CallContext;
use crate::core::cut::{FacetCut, apply_cut, diamond_cut_selector};
use crate::core::dispatch;
use crate::core::errors::{CallError, DeployError};
use crate::core::event::DiamondEvent;
use crate::core::loupe::{self, Facet};
use crate::core::ownership;
use crate::core::registry::{Registry, RegistryMut};
use crate::module::Module;
use crate::module::calldata::encode_call;
use crate::module::host::ModuleHost;
use crate::storage::state::OverlayState;
use crate::storage::store::{MemoryStore, StateStore};
use crate::types::address::Address;
use crate::types::hash::Hash;
use crate::types::selector::Selector;
use crate::{debug, info};
use bytes::Bytes;

pub struct Diamond<S: StateStore = MemoryStore> {
    address: Address,
    store: S,
    host: ModuleHost,
    config: DiamondConfig,
    events: Vec<DiamondEvent>,
}

impl Diamond<MemoryStore> {
    /// Deploys a diamond backed by an in-memory store.
    pub fn new(
        owner: Address,
        host: ModuleHost,
        cut_module: Address,
        config: DiamondConfig,
    ) -> Result<Self, DeployError> {
        Self::with_store(MemoryStore::new(), owner, host, cut_module, config)
    }
}

impl<S: StateStore> Diamond<S> {
    /// Deploys a diamond on `store`.
    ///
    /// Records `owner`, routes the cut function to `cut_module` and protects
    /// it together with the configured signatures. Fails if `cut_module` has
    /// no code.
    pub fn with_store(
        store: S,
        owner: Address,
        mut host: ModuleHost,
        cut_module: Address,
        config: DiamondConfig,
    ) -> Result<Self, DeployError> {
        let protected = config.protected_selectors()?;
        let address = host.derive_address(b"DIAMOND");
        let mut diamond = Self {
            address,
            store,
            host,
            config,
            events: Vec::new(),
        };

        diamond.execute(owner, 0, |ctx| {
            ownership::set_owner(ctx.state(), owner);
            ctx.emit(DiamondEvent::OwnershipTransferred {
                previous: Address::ZERO,
                new: owner,
            });
            let initial = [FacetCut::add(cut_module, vec![diamond_cut_selector()])];
            apply_cut(ctx, &initial, None, &[])?;

            let mut registry = RegistryMut::new(ctx.state());
            for &selector in &protected {
                registry.protect(selector);
            }
            Ok(())
        })?;

        info!("diamond deployed: address={address} owner={owner} cut_module={cut_module}");
        Ok(diamond)
    }

    /// Routes `calldata` to the module serving its selector.
    ///
    /// `value` is credited to the diamond's balance if the call succeeds.
    pub fn call(
        &mut self,
        sender: Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<Bytes, CallError> {
        self.execute(sender, value, |ctx| dispatch::dispatch(ctx, calldata))
    }

    /// Encodes and dispatches a `diamondCut` call.
    pub fn diamond_cut(
        &mut self,
        sender: Address,
        cuts: &[FacetCut],
        init: Option<Address>,
        init_calldata: &[u8],
    ) -> Result<(), CallError> {
        let calldata = encode_call(
            diamond_cut_selector(),
            &(cuts, init.unwrap_or(Address::ZERO), init_calldata),
        );
        self.call(sender, 0, &calldata).map(|_| ())
    }

    /// Owner-gated, single-step ownership transfer.
    pub fn transfer_ownership(
        &mut self,
        sender: Address,
        new_owner: Address,
    ) -> Result<(), CallError> {
        self.execute(sender, 0, |ctx| {
            ownership::transfer_ownership(ctx, new_owner)?;
            Ok(())
        })
    }

    pub fn facets(&self) -> Vec<Facet> {
        loupe::facets(&self.store)
    }

    pub fn facet_function_selectors(&self, module: Address) -> Vec<Selector> {
        loupe::facet_function_selectors(&self.store, module)
    }

    pub fn facet_addresses(&self) -> Vec<Address> {
        loupe::facet_addresses(&self.store)
    }

    pub fn facet_address(&self, selector: Selector) -> Address {
        loupe::facet_address(&self.store, selector)
    }

    pub fn supports_interface(&self, interface_id: Selector) -> bool {
        loupe::supports_interface(&self.store, interface_id)
    }

    /// Number of routed selectors.
    pub fn selector_count(&self) -> u64 {
        Registry::new(&self.store).identifier_count()
    }

    pub fn is_protected(&self, selector: Selector) -> bool {
        Registry::new(&self.store).is_protected(selector)
    }

    pub fn owner(&self) -> Address {
        ownership::owner(&self.store)
    }

    pub fn balance(&self) -> u128 {
        dispatch::balance(&self.store)
    }

    /// Committed events, oldest first.
    pub fn events(&self) -> &[DiamondEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<DiamondEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &DiamondConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state_root(&self) -> Hash {
        self.store.state_root()
    }

    pub fn host(&self) -> &ModuleHost {
        &self.host
    }

    /// Deploys module code next to this diamond so it can be cut in.
    pub fn deploy_module<M: Module + 'static>(&mut self, module: M) -> Address {
        self.host.deploy(module)
    }

    fn execute<T>(
        &mut self,
        sender: Address,
        value: u128,
        f: impl FnOnce(&mut CallContext<'_>) -> Result<T, CallError>,
    ) -> Result<T, CallError> {
        let mut events = Vec::new();
        let (result, writes) = {
            let mut overlay = OverlayState::new(&self.store);
            let mut ctx = CallContext::new(
                &self.host,
                self.address,
                self.config.max_call_depth,
                &mut overlay,
                &mut events,
                sender,
                value,
            );
            dispatch::credit(ctx.state(), value);
            let result = f(&mut ctx);
            (result, overlay.into_writes())
        };

        match &result {
            Ok(_) => {
                self.store.apply_batch(writes);
                self.events.append(&mut events);
            }
            Err(e) => debug!("call failed: diamond={} sender={sender} error={e}", self.address),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cut::CutAction;
    use crate::core::errors::{AccessError, CutError};
    use crate::module::builtin::init::{INIT, standard_interfaces};
    use crate::module::builtin::loupe::{FACET_ADDRESS, FACETS};
    use crate::module::builtin::ownership::{OWNER, TRANSFER_OWNERSHIP};
    use crate::module::builtin::{CutModule, StandardModules};
    use crate::module::calldata::decode_return;
    use crate::utils::test_utils::{
        Fixture, call0, counter_selectors, read_count, sel, setup, setup_with,
    };
    use std::collections::HashSet;

    fn s(v: u32) -> Selector {
        Selector::from_u32(v)
    }

    fn assert_loupe_consistent<S: StateStore>(diamond: &Diamond<S>) {
        let facets = diamond.facets();
        let addresses = diamond.facet_addresses();
        assert_eq!(facets.len(), addresses.len());

        let mut total = 0;
        let mut seen = HashSet::new();
        for (facet, address) in facets.iter().zip(&addresses) {
            assert_eq!(facet.module, *address);
            assert!(!facet.selectors.is_empty());
            assert_eq!(diamond.facet_function_selectors(facet.module), facet.selectors);
            for selector in &facet.selectors {
                assert_eq!(diamond.facet_address(*selector), facet.module);
                assert!(seen.insert(*selector), "{selector} listed twice");
            }
            total += facet.selectors.len() as u64;
        }
        assert_eq!(total, diamond.selector_count());
        assert_eq!(seen.len() as u64, diamond.selector_count());
    }

    #[test]
    fn construction_routes_and_protects_cut() {
        let mut host = ModuleHost::new();
        let cut = host.deploy(CutModule);
        let owner = Address::from_label("owner");
        let diamond = Diamond::new(owner, host, cut, DiamondConfig::default()).unwrap();

        assert_eq!(diamond.owner(), owner);
        assert_eq!(diamond.facet_address(diamond_cut_selector()), cut);
        assert!(diamond.is_protected(diamond_cut_selector()));
        assert_eq!(diamond.facet_addresses(), vec![cut]);
        assert_eq!(
            diamond.events()[0],
            DiamondEvent::OwnershipTransferred {
                previous: Address::ZERO,
                new: owner
            }
        );
        assert!(matches!(diamond.events()[1], DiamondEvent::DiamondCut { .. }));
        assert_loupe_consistent(&diamond);
    }

    #[test]
    fn construction_fails_without_cut_code() {
        let missing = Address::from_label("missing");
        let result = Diamond::new(
            Address::from_label("owner"),
            ModuleHost::new(),
            missing,
            DiamondConfig::default(),
        );
        assert!(matches!(
            result,
            Err(DeployError::Setup(CallError::Cut(CutError::NoCode { module }))) if module == missing
        ));
    }

    #[test]
    fn add_two_selectors_and_route() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            ..
        } = setup();
        let cuts = [FacetCut::add(echo, vec![s(0xAAAA_0001), s(0xAAAA_0002)])];
        diamond.diamond_cut(owner, &cuts, None, &[]).unwrap();

        assert!(diamond.facets().contains(&Facet {
            module: echo,
            selectors: vec![s(0xAAAA_0001), s(0xAAAA_0002)],
        }));
        assert_eq!(
            diamond.drain_events(),
            vec![DiamondEvent::DiamondCut {
                cuts: cuts.to_vec(),
                init: None,
                calldata: vec![],
            }]
        );

        let calldata = [0xAA, 0xAA, 0x00, 0x01, 0x42];
        let out = diamond.call(Address::from_label("anyone"), 0, &calldata).unwrap();
        assert_eq!(&out[..], &calldata);
        assert_loupe_consistent(&diamond);
    }

    #[test]
    fn duplicate_add_in_one_batch_is_rejected() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            counter,
            ..
        } = setup();
        let root = diamond.state_root();
        let cuts = [
            FacetCut::add(echo, vec![s(0xBEEF_0001)]),
            FacetCut::add(counter, vec![s(0xBEEF_0001)]),
        ];

        let err = diamond.diamond_cut(owner, &cuts, None, &[]).unwrap_err();
        assert_eq!(
            err,
            CallError::Cut(CutError::SelectorExists {
                selector: s(0xBEEF_0001),
                module: echo
            })
        );
        assert_eq!(diamond.facet_address(s(0xBEEF_0001)), Address::ZERO);
        assert_eq!(diamond.state_root(), root);
    }

    #[test]
    fn batch_with_invalid_last_operation_changes_nothing() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            echo,
            ..
        } = setup();
        let root = diamond.state_root();
        let cuts = [
            FacetCut::add(counter, counter_selectors()),
            FacetCut::add(echo, vec![s(1), s(2)]),
            FacetCut::remove(vec![s(0x0bad_0bad)]),
        ];

        let err = diamond.diamond_cut(owner, &cuts, None, &[]).unwrap_err();
        assert_eq!(
            err,
            CallError::Cut(CutError::SelectorMissing {
                selector: s(0x0bad_0bad)
            })
        );
        assert_eq!(diamond.state_root(), root);
        assert!(diamond.events().is_empty());
        assert_eq!(diamond.facet_address(sel("increment()")), Address::ZERO);
    }

    #[test]
    fn add_then_remove_restores_state() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            ..
        } = setup();
        let root = diamond.state_root();
        let selectors = vec![s(0x1111_0001), s(0x1111_0002), s(0x1111_0003)];

        diamond
            .diamond_cut(owner, &[FacetCut::add(echo, selectors.clone())], None, &[])
            .unwrap();
        assert_ne!(diamond.state_root(), root);

        diamond
            .diamond_cut(owner, &[FacetCut::remove(selectors)], None, &[])
            .unwrap();
        assert_eq!(diamond.state_root(), root);
        assert!(!diamond.facet_addresses().contains(&echo));
    }

    #[test]
    fn replace_moves_membership_and_keeps_state() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            counter_v2,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();
        diamond.call(owner, 0, &call0("increment()")).unwrap();
        let count_before = diamond.selector_count();

        let increment = sel("increment()");
        diamond
            .diamond_cut(owner, &[FacetCut::replace(counter_v2, vec![increment])], None, &[])
            .unwrap();

        assert_eq!(diamond.selector_count(), count_before);
        assert_eq!(diamond.facet_address(increment), counter_v2);
        assert!(!diamond.facet_function_selectors(counter).contains(&increment));
        assert_eq!(diamond.facet_function_selectors(counter_v2), vec![increment]);

        let out = diamond.call(owner, 0, &call0("increment()")).unwrap();
        assert_eq!(decode_return::<u64>(&out), Ok(11));
        assert_loupe_consistent(&diamond);
    }

    #[test]
    fn protected_cut_selector_cannot_change() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            modules,
            ..
        } = setup();
        let cut = diamond_cut_selector();

        let replace = diamond.diamond_cut(owner, &[FacetCut::replace(echo, vec![cut])], None, &[]);
        assert_eq!(
            replace,
            Err(CallError::Cut(CutError::ProtectedSelector { selector: cut }))
        );
        let remove = diamond.diamond_cut(owner, &[FacetCut::remove(vec![cut])], None, &[]);
        assert_eq!(
            remove,
            Err(CallError::Cut(CutError::ProtectedSelector { selector: cut }))
        );
        assert_eq!(diamond.facet_address(cut), modules.cut);
    }

    #[test]
    fn configured_signatures_are_protected() {
        let config = DiamondConfig {
            protected_signatures: vec!["increment()".into()],
            ..DiamondConfig::default()
        };
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup_with(config);
        let increment = sel("increment()");

        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, vec![increment])], None, &[])
            .unwrap();
        let err = diamond
            .diamond_cut(owner, &[FacetCut::remove(vec![increment])], None, &[])
            .unwrap_err();
        assert_eq!(
            err,
            CallError::Cut(CutError::ProtectedSelector {
                selector: increment
            })
        );
    }

    #[test]
    fn cut_validation_errors() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();
        let nowhere = Address::from_label("no code here");
        let increment = sel("increment()");

        let cases = [
            (
                FacetCut::add(Address::ZERO, vec![s(1)]),
                CutError::ZeroModule {
                    action: CutAction::Add,
                },
            ),
            (
                FacetCut::replace(Address::ZERO, vec![increment]),
                CutError::ZeroModule {
                    action: CutAction::Replace,
                },
            ),
            (
                FacetCut::add(counter, vec![]),
                CutError::NoSelectors { module: counter },
            ),
            (
                FacetCut::add(nowhere, vec![s(1)]),
                CutError::NoCode { module: nowhere },
            ),
            (
                FacetCut::replace(counter, vec![increment]),
                CutError::SameModule {
                    selector: increment,
                    module: counter,
                },
            ),
            (
                FacetCut::replace(counter, vec![s(1)]),
                CutError::SelectorMissing { selector: s(1) },
            ),
            (
                FacetCut {
                    module: counter,
                    action: CutAction::Remove,
                    selectors: vec![increment],
                },
                CutError::RemoveModuleNotZero { module: counter },
            ),
        ];

        let root = diamond.state_root();
        for (cut, expected) in cases {
            let err = diamond.diamond_cut(owner, &[cut], None, &[]).unwrap_err();
            assert_eq!(err, CallError::Cut(expected));
        }
        assert_eq!(diamond.state_root(), root);
    }

    #[test]
    fn init_failure_rolls_back_cut() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            reverting_init,
            ..
        } = setup();
        let root = diamond.state_root();

        let err = diamond
            .diamond_cut(
                owner,
                &[FacetCut::add(counter, counter_selectors())],
                Some(reverting_init),
                &call0("init()"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CallError::Cut(CutError::InitFailed { module, ref source })
                if module == reverting_init && matches!(**source, CallError::Revert(_))
        ));
        assert_eq!(diamond.facet_address(sel("increment()")), Address::ZERO);
        assert_eq!(read_count(diamond.store()), 0);
        assert_eq!(diamond.state_root(), root);
    }

    #[test]
    fn init_argument_rules() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            ..
        } = setup();
        let cuts = [FacetCut::add(echo, vec![s(7)])];

        assert_eq!(
            diamond.diamond_cut(owner, &cuts, None, &[1, 2, 3]),
            Err(CallError::Cut(CutError::InitCalldataWithoutModule))
        );

        let nowhere = Address::from_label("no code here");
        assert_eq!(
            diamond.diamond_cut(owner, &cuts, Some(nowhere), &[]),
            Err(CallError::Cut(CutError::NoCode { module: nowhere }))
        );

        diamond
            .diamond_cut(owner, &cuts, Some(Address::ZERO), &[])
            .unwrap();
        assert_eq!(diamond.facet_address(s(7)), echo);
    }

    #[test]
    fn init_declares_standard_interfaces() {
        let Fixture {
            mut diamond,
            owner,
            modules,
            echo,
            ..
        } = setup();
        let calldata = encode_call(INIT, &standard_interfaces());
        diamond
            .diamond_cut(owner, &[FacetCut::add(echo, vec![s(9)])], Some(modules.init), &calldata)
            .unwrap();

        for id in standard_interfaces() {
            assert!(diamond.supports_interface(id), "{id}");
        }
        assert!(!diamond.supports_interface(s(0xffff_ffff)));
        assert!(matches!(
            diamond.events().last(),
            Some(DiamondEvent::DiamondCut { init: Some(m), .. }) if *m == modules.init
        ));
    }

    #[test]
    fn non_owner_cannot_cut() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            ..
        } = setup();
        let mallory = Address::from_label("mallory");
        let err = diamond
            .diamond_cut(mallory, &[FacetCut::add(echo, vec![s(1)])], None, &[])
            .unwrap_err();
        assert_eq!(
            err,
            CallError::Access(AccessError::NotOwner {
                sender: mallory,
                owner
            })
        );
        assert_eq!(diamond.facet_address(s(1)), Address::ZERO);
    }

    #[test]
    fn non_owner_with_malformed_cut_is_unauthorized() {
        let Fixture {
            mut diamond, owner, ..
        } = setup();
        let mallory = Address::from_label("mallory");
        let calldata = encode_call(diamond_cut_selector(), &());

        assert_eq!(
            diamond.call(mallory, 0, &calldata),
            Err(CallError::Access(AccessError::NotOwner {
                sender: mallory,
                owner
            }))
        );
        assert!(matches!(
            diamond.call(owner, 0, &calldata),
            Err(CallError::InvalidCalldata { .. })
        ));
    }

    #[test]
    fn ownership_transfer_through_module() {
        let Fixture {
            mut diamond,
            owner,
            echo,
            ..
        } = setup();
        let alice = Address::from_label("alice");

        diamond
            .call(owner, 0, &encode_call(TRANSFER_OWNERSHIP, &alice))
            .unwrap();
        let out = diamond.call(alice, 0, &encode_call(OWNER, &())).unwrap();
        assert_eq!(decode_return::<Address>(&out), Ok(alice));
        assert_eq!(
            diamond.events().last(),
            Some(&DiamondEvent::OwnershipTransferred {
                previous: owner,
                new: alice
            })
        );

        let cuts = [FacetCut::add(echo, vec![s(1)])];
        assert!(matches!(
            diamond.diamond_cut(owner, &cuts, None, &[]),
            Err(CallError::Access(_))
        ));
        diamond.diamond_cut(alice, &cuts, None, &[]).unwrap();
    }

    #[test]
    fn direct_transfer_is_owner_gated_and_allows_renounce() {
        let Fixture {
            mut diamond, owner, ..
        } = setup();
        let bob = Address::from_label("bob");

        assert!(matches!(
            diamond.transfer_ownership(bob, bob),
            Err(CallError::Access(AccessError::NotOwner { .. }))
        ));
        diamond.transfer_ownership(owner, Address::ZERO).unwrap();
        assert_eq!(diamond.owner(), Address::ZERO);
    }

    #[test]
    fn loupe_module_matches_direct_reads() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();

        let out = diamond.call(owner, 0, &encode_call(FACETS, &())).unwrap();
        assert_eq!(decode_return::<Vec<Facet>>(&out), Ok(diamond.facets()));

        let out = diamond
            .call(owner, 0, &encode_call(FACET_ADDRESS, &sel("count()")))
            .unwrap();
        assert_eq!(decode_return::<Address>(&out), Ok(counter));
        assert_loupe_consistent(&diamond);
    }

    #[test]
    fn module_sees_caller_and_diamond() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();
        let carol = Address::from_label("carol");

        let out = diamond.call(carol, 7, &call0("whoami()")).unwrap();
        assert_eq!(
            decode_return::<(Address, Address, u128)>(&out),
            Ok((carol, diamond.address(), 7))
        );
        assert_eq!(diamond.balance(), 7);
    }

    #[test]
    fn nested_calls_share_state() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();

        let out = diamond.call(owner, 0, &call0("incrementTwice()")).unwrap();
        assert_eq!(decode_return::<u64>(&out), Ok(2));
        assert_eq!(read_count(diamond.store()), 2);
    }

    #[test]
    fn nested_failure_discards_only_nested_writes() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();

        let out = diamond.call(owner, 0, &call0("tryNested()")).unwrap();
        assert_eq!(decode_return::<u64>(&out), Ok(1));
        assert_eq!(read_count(diamond.store()), 1);
    }

    #[test]
    fn failed_call_commits_nothing() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();
        diamond.drain_events();
        let root = diamond.state_root();

        let err = diamond
            .call(owner, 9, &call0("incrementThenRevert()"))
            .unwrap_err();
        assert_eq!(err, CallError::Revert(Bytes::from_static(b"boom")));
        assert_eq!(diamond.state_root(), root);
        assert_eq!(diamond.balance(), 0);
        assert!(diamond.events().is_empty());
    }

    #[test]
    fn call_depth_is_bounded() {
        let config = DiamondConfig {
            max_call_depth: 16,
            ..DiamondConfig::default()
        };
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup_with(config);
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();

        let err = diamond.call(owner, 0, &call0("recurse()")).unwrap_err();
        assert_eq!(err, CallError::CallDepthExceeded { depth: 17, limit: 16 });
    }

    #[test]
    fn default_depth_limit_trips_before_the_stack_runs_out() {
        let Fixture {
            mut diamond,
            owner,
            counter,
            ..
        } = setup();
        diamond
            .diamond_cut(owner, &[FacetCut::add(counter, counter_selectors())], None, &[])
            .unwrap();
        let root = diamond.state_root();

        let err = diamond.call(owner, 0, &call0("recurse()")).unwrap_err();
        let limit = DiamondConfig::default().max_call_depth;
        assert_eq!(
            err,
            CallError::CallDepthExceeded {
                depth: limit + 1,
                limit
            }
        );
        assert_eq!(diamond.state_root(), root);
    }

    #[test]
    fn empty_calldata_is_a_value_transfer() {
        let Fixture { mut diamond, .. } = setup();
        let payer = Address::from_label("payer");

        let out = diamond.call(payer, 5, &[]).unwrap();
        assert!(out.is_empty());
        diamond.call(payer, 3, &[]).unwrap();
        assert_eq!(diamond.balance(), 8);
        assert_eq!(
            diamond.events(),
            &[
                DiamondEvent::Received {
                    from: payer,
                    value: 5
                },
                DiamondEvent::Received {
                    from: payer,
                    value: 3
                },
            ]
        );
    }

    #[test]
    fn unknown_selector_is_reported() {
        let Fixture { mut diamond, .. } = setup();
        let caller = Address::from_label("caller");

        assert_eq!(
            diamond.call(caller, 0, &[0xde, 0xad, 0xbe, 0xef, 0x00]),
            Err(CallError::FunctionNotFound(s(0xdead_beef)))
        );
        assert_eq!(
            diamond.call(caller, 0, &[0xab]),
            Err(CallError::FunctionNotFound(s(0xab00_0000)))
        );
    }

    #[test]
    fn malformed_cut_arguments() {
        let Fixture {
            mut diamond, owner, ..
        } = setup();
        let mut calldata = diamond_cut_selector().0.to_vec();
        calldata.push(1);
        assert!(matches!(
            diamond.call(owner, 0, &calldata),
            Err(CallError::InvalidCalldata { selector, .. }) if selector == diamond_cut_selector()
        ));
    }

    #[test]
    fn standard_fixture_routes_builtins() {
        let Fixture {
            diamond, modules, ..
        } = setup();
        let StandardModules {
            cut,
            loupe,
            ownership,
            ..
        } = modules;
        assert_eq!(diamond.facet_addresses(), vec![cut, loupe, ownership]);
        assert_eq!(diamond.facet_address(FACETS), loupe);
        assert_eq!(diamond.facet_address(OWNER), ownership);
        assert_loupe_consistent(&diamond);
    }
}
