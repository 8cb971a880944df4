mod confirm;
mod crop_form;
mod input;
mod key_result;
mod notice;
mod search_input;

pub use confirm::{ConfirmDialog, ConfirmEvent};
pub use crop_form::{CropForm, FormEvent, Submission};
#[cfg(test)]
pub use crop_form::FormField;
pub use key_result::KeyResult;
pub use notice::{Notice, NoticeKind};
pub use search_input::{SearchEvent, SearchInput};
