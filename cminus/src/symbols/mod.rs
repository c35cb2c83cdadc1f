mod table;

pub use table::{
    funcs::{FuncEntry, FuncMap},
    usages::{CallSite, IndexUse, Ref, UsageEntry, UsageMap},
    vars::{VarEntry, VarMap},
};

use serde::Serialize;

/// Declaration and usage tables of one compilation unit
#[derive(Debug, Default, Serialize)]
pub struct Symbols {
    pub vars: VarMap,
    pub funcs: FuncMap,
    pub usages: UsageMap,
    #[serde(skip)]
    slots: usize,
}

impl Symbols {
    /// Memory slots are shared by variables and functions
    pub fn next_slot(&mut self) -> usize {
        let slot = self.slots;
        self.slots += 1;
        slot
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
