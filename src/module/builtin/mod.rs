//! Standard modules every diamond is expected to expose.
//!
//! | module      | functions                                                   |
//! |-------------|-------------------------------------------------------------|
//! | `cut`       | `diamondCut`                                                |
//! | `loupe`     | `facets`, `facetFunctionSelectors`, `facetAddresses`, `facetAddress`, `supportsInterface` |
//! | `ownership` | `owner`, `transferOwnership`                                |
//! | `init`      | `init(bytes4[])`, meant only as a cut's init target         |

pub mod cut;
pub mod init;
pub mod loupe;
pub mod ownership;

pub use cut::CutModule;
pub use init::InitModule;
pub use loupe::LoupeModule;
pub use ownership::OwnershipModule;

use crate::core::cut::FacetCut;
use crate::module::Module;
use crate::module::host::ModuleHost;
use crate::types::address::Address;

/// Addresses of the deployed standard modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardModules {
    pub cut: Address,
    pub loupe: Address,
    pub ownership: Address,
    pub init: Address,
}

/// Deploys one instance of each standard module.
pub fn deploy_standard(host: &mut ModuleHost) -> StandardModules {
    StandardModules {
        cut: host.deploy(CutModule),
        loupe: host.deploy(LoupeModule),
        ownership: host.deploy(OwnershipModule),
        init: host.deploy(InitModule),
    }
}

/// Cuts that route the loupe and ownership functions. The cut function
/// itself is bound when the diamond is constructed.
pub fn standard_cuts(modules: &StandardModules) -> Vec<FacetCut> {
    vec![
        FacetCut::add(modules.loupe, LoupeModule.selectors()),
        FacetCut::add(modules.ownership, OwnershipModule.selectors()),
    ]
}
