pub mod editor;
pub mod links_form;
pub mod login;
pub mod navbar;
pub mod placeholder;
pub mod preview;
pub mod profile_form;
pub mod signup;
pub mod toast;
