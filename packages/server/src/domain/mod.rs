//! ドメイン層
//!
//! - `entity`: Room / PlayerState
//! - `value_object`: 検証済みの値
//! - `scheduler`: レース開始時刻の決定
//! - `repository` / `message_pusher`: Infrastructure 層が実装する trait

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod scheduler;
pub mod value_object;

pub use entity::{PlayerState, RacePhase, Room};
pub use error::{MessagePushError, RoomError, ValueObjectError};
pub use factory::PlayerIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use scheduler::{DEFAULT_LEAD_MS, RaceScheduler};
pub use value_object::{
    PlayerId, PlayerName, Progress, ProgressReport, RaceText, RoomId, Timestamp,
};
