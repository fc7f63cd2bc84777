//! The live survey-question list.
//!
//! Question texts are editable by administrators while the service runs,
//! so the engine exposes them as an explicit observable value backed by a
//! `tokio::sync::watch` channel rather than shared mutable state.
//!
//! The feed is strictly a rendering input: the set of validated fields is
//! fixed by [`crate::fields::FieldId`], and a question-list update can
//! never touch answer values already collected in a snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Which section of the instrument a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    /// Service Quality Dimension.
    Sqd,
    /// Citizen's Charter.
    Cc,
}

/// One renderable survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescriptor {
    pub code: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub required: bool,
    pub order: u32,
}

/// The shipped question set.
pub fn default_questions() -> Vec<QuestionDescriptor> {
    const SQD_TEXTS: [&str; 9] = [
        "I am satisfied with the service that I availed.",
        "I spent a reasonable amount of time for my transaction.",
        "The office followed the transaction's requirements and steps based on the information provided.",
        "The steps (including payment) I needed to do for my transaction were easy and simple.",
        "I easily found information about my transaction from the office or its website.",
        "I paid a reasonable amount of fees for my transaction. (If service was free, mark the 'N/A' option)",
        "I feel the office was fair to everyone, or 'walang palakasan', during my transaction.",
        "I was treated courteously by the staff, and (if asked for help) the staff was helpful.",
        "I got what I needed from the government office, or if denied, the reason was explained to me clearly.",
    ];
    const CC_TEXTS: [&str; 3] = [
        "Which of the following best describes your awareness of a CC?",
        "If aware of the CC (answered 1-3 in CC1), would you say that the CC of this office was easy to see?",
        "If aware of the CC (answered 1-3 in CC1), how much did the CC help you in your transaction?",
    ];

    let mut questions = Vec::with_capacity(12);
    for (i, text) in SQD_TEXTS.iter().enumerate() {
        questions.push(QuestionDescriptor {
            code: format!("SQD{i}"),
            text: (*text).to_string(),
            kind: QuestionKind::Sqd,
            required: true,
            order: i as u32 + 1,
        });
    }
    for (i, text) in CC_TEXTS.iter().enumerate() {
        questions.push(QuestionDescriptor {
            code: format!("CC{}", i + 1),
            text: (*text).to_string(),
            kind: QuestionKind::Cc,
            required: true,
            order: SQD_TEXTS.len() as u32 + i as u32 + 1,
        });
    }
    questions
}

/// Observable, always-ordered question list.
///
/// Designed to be shared via `Arc<QuestionFeed>`: the owner publishes
/// replacement lists, renderers subscribe and re-render on change.
pub struct QuestionFeed {
    sender: watch::Sender<Arc<Vec<QuestionDescriptor>>>,
}

impl QuestionFeed {
    pub fn new(initial: Vec<QuestionDescriptor>) -> Self {
        let mut initial = initial;
        initial.sort_by_key(|q| q.order);
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// Replace the live list. The new list is sorted by `order` before it
    /// is broadcast to subscribers.
    pub fn publish(&self, mut questions: Vec<QuestionDescriptor>) {
        questions.sort_by_key(|q| q.order);
        self.sender.send_replace(Arc::new(questions));
    }

    /// Subscribe to list changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<QuestionDescriptor>>> {
        self.sender.subscribe()
    }

    /// The current list.
    pub fn current(&self) -> Arc<Vec<QuestionDescriptor>> {
        self.sender.borrow().clone()
    }
}

impl Default for QuestionFeed {
    fn default() -> Self {
        Self::new(default_questions())
    }
}
