//! Model selection
//!
//! - `split`: seeded train/test split
//! - `kfold`: contiguous k-fold index generation
//! - `grid_search`: exhaustive hyperparameter search scored by CV R²

pub mod split;
pub mod kfold;
pub mod grid_search;

pub use split::{train_test_split, TrainTestSplit};
pub use kfold::KFold;
pub use grid_search::{CandidateScore, GridSearchCv, GridSearchResult, ParamGrid};
