mod site_8891;

pub use site_8891::{Parser, Site8891Parser};
