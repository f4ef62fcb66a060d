pub mod work_list;

pub use work_list::{WorkItem, WorkList, AUDIO_COLUMN, URL_COLUMN, WORD_COLUMN};
