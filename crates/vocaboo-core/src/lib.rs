pub mod choices;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod normalize;
pub mod sequencer;
pub mod session;
pub mod store;

pub use choices::{ChoiceSet, DistractorGenerator};
pub use error::{StoreError, TrainerError};
pub use evaluator::{Evaluation, Verdict, evaluate};
pub use normalize::{FoldingNormalizer, Normalizer};
pub use sequencer::Sequencer;
pub use session::{Card, CardPhase, IgnoreReason, Submission, TrainingSession, VocabularyChange};
pub use store::{MemoryStore, ProgressStore, VocabularyStore, add_unique, persist_evaluation};
