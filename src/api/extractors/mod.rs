/*!
 * Request extractors
 *
 * Public API:
 * - CurrentUser
 * - JsonBody, IdPath (rejection は AppError の JSON body で返す)
 */
mod current_user;
mod id_path;
mod json_body;

pub use current_user::CurrentUser;
pub use id_path::IdPath;
pub use json_body::JsonBody;
