//! Folder tree mutations and path resolution.

pub mod navigate;
pub mod ops;

pub use navigate::{Navigation, navigate};
pub use ops::{
    NewAsset, add_assets, add_folder, check_folder_depth, check_folder_name, rename_folder,
    toggle_expansion,
};
