pub(crate) mod format;
pub(crate) mod logging;
pub(crate) mod timezone;

pub(crate) use format::{format_duration, format_minutes, format_percentage};
pub(crate) use logging::init_logging;
pub(crate) use timezone::Timezone;
