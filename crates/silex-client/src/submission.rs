//! Review submission widget.
//!
//! Collects a star rating, the author's name, and the review text, and
//! sends them exactly once. Once the request settles the widget is done:
//! it shows the thank-you state whether or not the server accepted the
//! review, and a transport failure is only logged.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use silex_core::review::ReviewDraft;

use crate::api::ReviewsApi;
use crate::error::SubmitError;

/// Where the widget is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting input.
    Editing,
    /// The create request is in flight.
    Submitting,
    /// Terminal: the request settled.
    Submitted,
}

#[derive(Debug)]
struct Form {
    stars: i64,
    author: String,
    text: String,
    phase: Phase,
}

type Callback = Box<dyn Fn() + Send + Sync>;

/// One visitor's review form.
pub struct SubmissionWidget {
    api: Arc<dyn ReviewsApi>,
    form: Mutex<Form>,
    on_submitted: Option<Callback>,
}

impl fmt::Debug for SubmissionWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionWidget")
            .field("form", &*self.lock())
            .field("on_submitted", &self.on_submitted.is_some())
            .finish_non_exhaustive()
    }
}

impl SubmissionWidget {
    /// Empty form: no rating, no author, no text.
    #[must_use]
    pub fn new(api: Arc<dyn ReviewsApi>) -> Self {
        Self {
            api,
            form: Mutex::new(Form {
                stars: 0,
                author: String::new(),
                text: String::new(),
                phase: Phase::Editing,
            }),
            on_submitted: None,
        }
    }

    /// Run `callback` after the submission settles, e.g. to refresh a feed.
    #[must_use]
    pub fn on_submitted(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_submitted = Some(Box::new(callback));
        self
    }

    fn lock(&self) -> MutexGuard<'_, Form> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn edit(&self, apply: impl FnOnce(&mut Form)) -> Result<(), SubmitError> {
        let mut form = self.lock();
        match form.phase {
            Phase::Editing => {
                apply(&mut form);
                Ok(())
            }
            Phase::Submitting => Err(SubmitError::InFlight),
            Phase::Submitted => Err(SubmitError::AlreadySubmitted),
        }
    }

    /// Choose a rating. `0` clears it.
    ///
    /// # Errors
    ///
    /// Fails once the form has been sent.
    pub fn set_stars(&self, stars: i64) -> Result<(), SubmitError> {
        self.edit(|f| f.stars = stars)
    }

    /// # Errors
    ///
    /// Fails once the form has been sent.
    pub fn set_author(&self, author: impl Into<String>) -> Result<(), SubmitError> {
        let author = author.into();
        self.edit(|f| f.author = author)
    }

    /// # Errors
    ///
    /// Fails once the form has been sent.
    pub fn set_text(&self, text: impl Into<String>) -> Result<(), SubmitError> {
        let text = text.into();
        self.edit(|f| f.text = text)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// True once the request has settled.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase() == Phase::Submitted
    }

    /// Whether [`submit`](Self::submit) would send a request right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        let form = self.lock();
        form.phase == Phase::Editing && draft_of(&form).is_complete()
    }

    /// Send the review.
    ///
    /// At most one create request is ever sent per widget. The outcome of
    /// that request is not reported: success and failure both end in
    /// [`Phase::Submitted`].
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Incomplete`] if a field is missing; nothing is sent.
    /// - [`SubmitError::InFlight`] if another submit is still running.
    /// - [`SubmitError::AlreadySubmitted`] after the widget has finished.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let draft = {
            let mut form = self.lock();
            match form.phase {
                Phase::Submitting => return Err(SubmitError::InFlight),
                Phase::Submitted => return Err(SubmitError::AlreadySubmitted),
                Phase::Editing => {}
            }
            let draft = draft_of(&form);
            if !draft.is_complete() {
                return Err(SubmitError::Incomplete);
            }
            form.phase = Phase::Submitting;
            draft
        };

        match self.api.create(&draft).await {
            Ok(id) => info!(id = ?id, "review submitted for moderation"),
            Err(e) => warn!(error = %e, "review submission failed"),
        }

        self.lock().phase = Phase::Submitted;
        if let Some(callback) = &self.on_submitted {
            callback();
        }
        Ok(())
    }
}

fn draft_of(form: &Form) -> ReviewDraft {
    ReviewDraft::new(form.author.clone(), form.text.clone(), form.stars)
}
