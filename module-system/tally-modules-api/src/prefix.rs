use sha2::Digest;

use crate::Context;

// separator == "/"
const DOMAIN_SEPARATOR: [u8; 1] = [47];

/// A unique identifier for each state variable in a module.
#[derive(Debug, PartialEq, Eq)]
pub struct Prefix {
    module_path: &'static str,
    module_name: &'static str,
    storage_name: Option<&'static str>,
}

impl Prefix {
    pub fn new_storage(
        module_path: &'static str,
        module_name: &'static str,
        storage_name: &'static str,
    ) -> Self {
        Self {
            module_path,
            module_name,
            storage_name: Some(storage_name),
        }
    }

    pub fn new_module(module_path: &'static str, module_name: &'static str) -> Self {
        Self {
            module_path,
            module_name,
            storage_name: None,
        }
    }

    fn combine_prefix(&self) -> Vec<u8> {
        let mut combined_prefix = Vec::new();
        for part in [Some(self.module_path), Some(self.module_name), self.storage_name]
            .into_iter()
            .flatten()
        {
            combined_prefix.extend(part.as_bytes());
            combined_prefix.extend(DOMAIN_SEPARATOR);
        }
        combined_prefix
    }

    pub fn hash<C: Context>(&self) -> [u8; 32] {
        let mut hasher = C::Hasher::new();
        hasher.update(self.combine_prefix());
        hasher.finalize().into()
    }
}

impl From<Prefix> for tally_state::Prefix {
    fn from(prefix: Prefix) -> Self {
        tally_state::Prefix::new(prefix.combine_prefix())
    }
}
