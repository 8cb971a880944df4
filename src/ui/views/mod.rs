mod crop_detail;
mod crop_list;

pub use crop_detail::CropDetailView;
pub use crop_list::CropListView;
