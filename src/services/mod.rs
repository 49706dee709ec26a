/*
 * Responsibility
 * - トークン抽出・検証・主体 (Identity) の構築
 * - AuthBackend: request head から呼び出し元を決めるインターフェース
 */
pub mod auth;
