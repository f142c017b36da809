//! Client-side form state.
//!
//! Forms hold whatever the user has typed so far and only talk to a service when explicitly
//! saved. Saving is split into `begin_save`, which validates and snapshots the form, and
//! `finish_save`, which records the outcome. Between the two the form is marked busy so a second
//! save cannot start, even when the I/O in between runs on another thread.

use crate::{Error, Result};

pub mod credentials;
pub mod links;
pub mod profile;

pub use credentials::{LoginForm, SignupForm};
pub use links::{DraftChange, DraftId, LinkDraft, LinkForm};
pub use profile::{AvatarFile, ProfileField, ProfileForm};

/// Marks a form as having a save outstanding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight(bool);

impl InFlight {
    pub fn acquire(&mut self) -> Result<()> {
        if self.0 {
            return Err(Error::SaveInProgress);
        }
        self.0 = true;
        Ok(())
    }

    pub fn release(&mut self) {
        self.0 = false;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::InFlight;
    use crate::Error;

    #[test]
    fn test_acquire_twice() {
        let mut flag = InFlight::default();

        flag.acquire().unwrap();
        assert!(matches!(flag.acquire(), Err(Error::SaveInProgress)));

        flag.release();
        assert!(flag.acquire().is_ok());
    }
}
