/*
 * Responsibility
 * - handler から呼ばれるドメインロジック (DB に依存しないもの)
 * - auth: トークン検証 / 発行 / ロール判定
 * - purchase_history: 購入履歴の追加ルール
 */
pub mod auth;
pub mod purchase_history;
