/*!
 * Authenticated user extractor
 *
 * Responsibility:
 * - 認証済みリクエストの IdentityClaim を handler に提供する
 * - claim 自体の型は services::auth::claims (middleware と共有)
 */

mod core;

pub use self::core::CurrentUser;
