use std::collections::BTreeMap;
use std::path::PathBuf;

/// What every modality agent receives: the ordered page texts and the
/// directory its assets belong under (`<story>/<modality>/`).
#[derive(Clone, Debug)]
pub struct ModalityRequest {
    /// Ordered page texts.
    pub pages: Vec<String>,
    /// Directory the agent writes its assets into.
    pub save_dir: PathBuf,
}

/// Collaborator seam for one generative modality (speech, sound, music).
///
/// Implementations wrap external generators; the composition engine only
/// relies on the files they leave behind under the story directory's
/// naming convention.
pub trait ModalityAgent: Send + Sync {
    /// Stable key in the outcome map ("speech", "sound", "music"). Keys
    /// must be unique across the dispatched agents.
    fn name(&self) -> &str;

    /// Produce this modality's assets and return a report (prompts used,
    /// file listing, whatever the collaborator wants to persist).
    fn generate(&self, request: &ModalityRequest) -> anyhow::Result<serde_json::Value>;
}

/// Tagged result of one modality agent.
///
/// A crashed or failed agent yields an explicit `Failed` entry rather than
/// a silently absent key, so downstream code matches on the variant.
#[derive(Clone, Debug)]
pub enum ModalityOutcome {
    /// The agent finished and returned its report.
    Completed(serde_json::Value),
    /// The agent returned an error or panicked; the description says which.
    Failed(String),
}

impl ModalityOutcome {
    /// True for [`ModalityOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Fork-join dispatch: run every agent on its own thread against the same
/// request, wait for all of them, and collect one tagged outcome per
/// modality name.
pub fn run_modalities(
    agents: &[Box<dyn ModalityAgent>],
    request: &ModalityRequest,
) -> BTreeMap<String, ModalityOutcome> {
    let mut outcomes = BTreeMap::new();
    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(agents.len());
        for agent in agents {
            let name = agent.name().to_string();
            handles.push((name, scope.spawn(move || agent.generate(request))));
        }
        for (name, handle) in handles {
            let outcome = match handle.join() {
                Ok(Ok(report)) => ModalityOutcome::Completed(report),
                Ok(Err(err)) => ModalityOutcome::Failed(format!("{err:#}")),
                Err(_) => ModalityOutcome::Failed("agent panicked".to_string()),
            };
            if let ModalityOutcome::Failed(reason) = &outcome {
                tracing::warn!(modality = %name, %reason, "modality agent failed");
            }
            outcomes.insert(name, outcome);
        }
    });
    outcomes
}
