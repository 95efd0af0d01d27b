//! UseCase テスト用のヘルパー

use std::{collections::HashMap, sync::Arc, sync::Mutex as StdMutex};

use async_trait::async_trait;
use keyrace_shared::protocol::ServerMessage;
use tokio::sync::Mutex;

use crate::{
    domain::{
        MessagePushError, MessagePusher, PlayerId, PlayerName, PlayerState, PusherChannel,
        RaceText, Room, RoomId, RoomRepository, Timestamp,
    },
    infrastructure::repository::InMemoryRoomRepository,
};

/// 送信内容を記録するだけの MessagePusher
#[derive(Default)]
pub struct RecordingPusher {
    pushed: StdMutex<Vec<(PlayerId, String)>>,
    broadcasts: StdMutex<Vec<(Vec<PlayerId>, String)>>,
}

impl RecordingPusher {
    pub fn pushed(&self) -> Vec<(PlayerId, ServerMessage)> {
        self.pushed
            .lock()
            .unwrap()
            .iter()
            .map(|(id, json)| (id.clone(), ServerMessage::parse(json).unwrap()))
            .collect()
    }

    pub fn broadcasts(&self) -> Vec<(Vec<PlayerId>, ServerMessage)> {
        self.broadcasts
            .lock()
            .unwrap()
            .iter()
            .map(|(ids, json)| (ids.clone(), ServerMessage::parse(json).unwrap()))
            .collect()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _player_id: PlayerId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _player_id: &PlayerId) {}

    async fn push_to(&self, player_id: &PlayerId, content: &str) -> Result<(), MessagePushError> {
        self.pushed
            .lock()
            .unwrap()
            .push((player_id.clone(), content.to_string()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        self.broadcasts
            .lock()
            .unwrap()
            .push((targets, content.to_string()));
        Ok(())
    }
}

pub fn create_test_repository() -> Arc<InMemoryRoomRepository> {
    Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))))
}

pub fn rid(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn pid(id: &str) -> PlayerId {
    PlayerId::new(id.to_string()).unwrap()
}

pub fn name(value: &str) -> PlayerName {
    PlayerName::new(value.to_string()).unwrap()
}

pub fn text(value: &str) -> RaceText {
    RaceText::new(value.to_string()).unwrap()
}

/// host が "h"、参加者が `others` の Room "ABCD" を用意する
pub async fn seed_room(repository: &InMemoryRoomRepository, others: &[&str]) -> Room {
    let host = PlayerState::new(pid("h"), name("H"));
    let mut room = repository
        .create_room(Room::new(
            rid("ABCD"),
            text("hello world"),
            host,
            Timestamp::new(0),
        ))
        .await
        .unwrap();
    for other in others {
        room = repository
            .join_room(
                &rid("ABCD"),
                PlayerState::new(pid(other), name(&other.to_uppercase())),
            )
            .await
            .unwrap();
    }
    room
}
