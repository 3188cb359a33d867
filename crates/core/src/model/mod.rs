mod course;
mod ids;
mod question;
mod video;

pub use course::{Course, CourseError, CourseStatus, percent_rounded};
pub use ids::{CourseId, OptionId, ParseIdError, QuestionId, VideoId};
pub use question::{AnswerOption, Question, QuestionError};
pub use video::{Video, VideoError};
