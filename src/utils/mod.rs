pub mod environment;
pub mod paths;

pub use environment::{get_claude_dir, get_projects_dir};
pub use paths::{
    CONVERSATION_EXTENSION, decode_project_name, encode_project_name, format_path_with_tilde,
    from_url_safe, project_name_from_path, to_url_safe, to_url_safe_os,
    validate_conversation_filename, validate_file_size, validate_project_id,
};
