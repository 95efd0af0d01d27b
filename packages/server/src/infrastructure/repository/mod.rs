//! Repository の実装
//!
//! - `inmemory`: プロセス内の HashMap を使った実装
//! - 将来的に: 複数サーバーで共有するストア（Redis + pub/sub など）

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
