pub mod approvals;
pub mod brief;

pub const SYSTEM_NAME: &str = "Autonomous Engineering OS";
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M UTC";
