use std::collections::HashMap;

use poker_node::domains::message::{
    NodeMessage, NodeMessageData, NodeMessageType, ScrumTeamMemberEstimationMessage,
    ScrumTeamMemberMessage, ScrumTeamMessage, TeamMessagePayload,
};
use poker_node::error::PokerNodeError;
use poker_node::services::codec::{
    MessageCodec, WireHeaders, WireMessage, MESSAGE_TYPE_HEADER, RECIPIENT_ID_HEADER,
    SENDER_ID_HEADER,
};

fn envelope(
    message_type: NodeMessageType,
    sender: &str,
    recipient: &str,
    data: Option<NodeMessageData>,
) -> NodeMessage {
    let mut message = NodeMessage::new(message_type);
    message.sender_node_id = sender.to_string();
    message.recipient_node_id = recipient.to_string();
    message.data = data;
    message
}

#[test]
fn round_trips_team_message_payloads() {
    let payloads = vec![
        TeamMessagePayload::Base(ScrumTeamMessage {
            team_name: "alpha".to_string(),
            message_type: "EstimationStarted".to_string(),
        }),
        TeamMessagePayload::MemberChanged(ScrumTeamMemberMessage {
            team_name: "alpha".to_string(),
            message_type: "MemberJoined".to_string(),
            member_type: "Member".to_string(),
            member_name: "alice".to_string(),
        }),
        TeamMessagePayload::MemberEstimation(ScrumTeamMemberEstimationMessage {
            team_name: "alpha".to_string(),
            message_type: "MemberEstimated".to_string(),
            member_name: "bob".to_string(),
            estimation: Some(8.0),
        }),
    ];

    for payload in payloads {
        let original = envelope(
            NodeMessageType::ScrumTeamMessage,
            "node-1",
            "node-2",
            Some(NodeMessageData::TeamMessage(payload)),
        );
        let wire = MessageCodec::encode(&original).unwrap();
        let decoded = MessageCodec::decode(&wire).unwrap();
        assert_eq!(decoded, original);
    }
}

#[test]
fn round_trips_team_list() {
    let original = envelope(
        NodeMessageType::TeamList,
        "node-1",
        "node-2",
        Some(NodeMessageData::TeamList(vec![
            "alpha".to_string(),
            "beta".to_string(),
        ])),
    );
    let wire = MessageCodec::encode(&original).unwrap();
    let decoded = MessageCodec::decode(&wire).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn opaque_text_passes_through_verbatim() {
    let text = r#"{"name":"alpha","members":[{"name":"alice"}]}"#;
    for message_type in [NodeMessageType::TeamCreated, NodeMessageType::InitializeTeam] {
        let original = envelope(
            message_type,
            "node-1",
            "",
            Some(NodeMessageData::SerializedTeam(text.to_string())),
        );
        let wire = MessageCodec::encode(&original).unwrap();
        assert_eq!(wire.body, text.as_bytes());
        let decoded = MessageCodec::decode(&wire).unwrap();
        assert_eq!(decoded, original);
    }
}

#[test]
fn raw_text_type_rejects_structured_payload() {
    let original = envelope(
        NodeMessageType::TeamCreated,
        "node-1",
        "",
        Some(NodeMessageData::TeamList(vec!["alpha".to_string()])),
    );
    assert!(matches!(
        MessageCodec::encode(&original),
        Err(PokerNodeError::Serialization(_))
    ));
}

#[test]
fn invalid_utf8_opaque_body_is_a_per_message_error() {
    for message_type in ["TeamCreated", "InitializeTeam"] {
        let wire = WireMessage {
            body: vec![0xff, 0xfe, 0x80],
            headers: WireHeaders {
                message_type: message_type.to_string(),
                message_subtype: None,
                sender_id: "node-1".to_string(),
                recipient_id: String::new(),
            },
        };
        assert!(matches!(
            MessageCodec::decode(&wire),
            Err(PokerNodeError::MalformedBody(_))
        ));
    }
}

#[test]
fn structured_type_rejects_mismatched_payload() {
    let original = envelope(
        NodeMessageType::TeamList,
        "node-1",
        "",
        Some(NodeMessageData::TeamMessage(TeamMessagePayload::Base(
            ScrumTeamMessage {
                team_name: "alpha".to_string(),
                message_type: "EstimationStarted".to_string(),
            },
        ))),
    );
    assert!(matches!(
        MessageCodec::encode(&original),
        Err(PokerNodeError::Serialization(_))
    ));

    let original = envelope(
        NodeMessageType::ScrumTeamMessage,
        "node-1",
        "",
        Some(NodeMessageData::SerializedTeam("{}".to_string())),
    );
    assert!(matches!(
        MessageCodec::encode(&original),
        Err(PokerNodeError::Serialization(_))
    ));
}

#[test]
fn subtype_selects_concrete_shape_case_insensitively() {
    let body = serde_json::to_vec(&ScrumTeamMemberEstimationMessage {
        team_name: "alpha".to_string(),
        message_type: "MemberEstimated".to_string(),
        member_name: "bob".to_string(),
        estimation: None,
    })
    .unwrap();
    let wire = WireMessage {
        body,
        headers: WireHeaders {
            message_type: "ScrumTeamMessage".to_string(),
            message_subtype: Some("scrumteamMEMBERestimationmessage".to_string()),
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    let decoded = MessageCodec::decode(&wire).unwrap();
    match decoded.data {
        Some(NodeMessageData::TeamMessage(TeamMessagePayload::MemberEstimation(payload))) => {
            assert_eq!(payload.member_name, "bob");
            assert_eq!(payload.estimation, None);
        }
        other => panic!("expected member estimation payload, got {other:?}"),
    }
}

#[test]
fn unknown_subtype_falls_back_to_base_shape() {
    let body = serde_json::to_vec(&ScrumTeamMessage {
        team_name: "alpha".to_string(),
        message_type: "EstimationEnded".to_string(),
    })
    .unwrap();
    let wire = WireMessage {
        body,
        headers: WireHeaders {
            message_type: "ScrumTeamMessage".to_string(),
            message_subtype: Some("Bogus".to_string()),
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    let decoded = MessageCodec::decode(&wire).unwrap();
    assert!(matches!(
        decoded.data,
        Some(NodeMessageData::TeamMessage(TeamMessagePayload::Base(_)))
    ));
}

#[test]
fn missing_message_type_attribute_is_an_error() {
    let mut attributes = HashMap::new();
    attributes.insert(SENDER_ID_HEADER.to_string(), "node-1".to_string());
    assert!(matches!(
        WireHeaders::from_attributes(&attributes),
        Err(PokerNodeError::MissingHeader(_))
    ));
}

#[test]
fn unrecognized_message_type_is_an_error() {
    let wire = WireMessage {
        body: Vec::new(),
        headers: WireHeaders {
            message_type: "TeamDestroyed".to_string(),
            message_subtype: None,
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    assert!(matches!(
        MessageCodec::decode(&wire),
        Err(PokerNodeError::UnknownMessageType(_))
    ));
}

#[test]
fn empty_body_team_message_decodes_to_no_payload() {
    let wire = WireMessage {
        body: Vec::new(),
        headers: WireHeaders {
            message_type: "ScrumTeamMessage".to_string(),
            message_subtype: None,
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    let decoded = MessageCodec::decode(&wire).unwrap();
    assert_eq!(decoded.data, None);
}

#[test]
fn empty_body_team_list_decodes_to_empty_list() {
    let wire = WireMessage {
        body: Vec::new(),
        headers: WireHeaders {
            message_type: "TeamList".to_string(),
            message_subtype: None,
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    let decoded = MessageCodec::decode(&wire).unwrap();
    assert_eq!(decoded.data, Some(NodeMessageData::TeamList(Vec::new())));
}

#[test]
fn malformed_body_is_a_per_message_error() {
    let wire = WireMessage {
        body: b"not json at all".to_vec(),
        headers: WireHeaders {
            message_type: "TeamList".to_string(),
            message_subtype: None,
            sender_id: "node-1".to_string(),
            recipient_id: String::new(),
        },
    };
    assert!(matches!(
        MessageCodec::decode(&wire),
        Err(PokerNodeError::MalformedBody(_))
    ));
}

#[test]
fn absent_recipient_attribute_means_broadcast() {
    let mut attributes = HashMap::new();
    attributes.insert(MESSAGE_TYPE_HEADER.to_string(), "RequestTeams".to_string());
    attributes.insert(SENDER_ID_HEADER.to_string(), "node-1".to_string());
    let headers = WireHeaders::from_attributes(&attributes).unwrap();
    assert_eq!(headers.recipient_id, "");

    let decoded = MessageCodec::decode(&WireMessage {
        body: Vec::new(),
        headers,
    })
    .unwrap();
    assert!(decoded.is_broadcast());

    let wire = MessageCodec::encode(&decoded).unwrap();
    assert_eq!(wire.headers.recipient_id, "");
}

#[test]
fn request_teams_without_data_encodes_to_empty_body() {
    let original = envelope(NodeMessageType::RequestTeams, "node-1", "", None);
    let wire = MessageCodec::encode(&original).unwrap();

    assert!(wire.body.is_empty());
    assert_eq!(wire.headers.message_type, "RequestTeams");
    assert_eq!(wire.headers.message_subtype, None);
    assert_eq!(wire.headers.sender_id, "node-1");
    assert_eq!(wire.headers.recipient_id, "");

    let attributes = wire.headers.to_attributes();
    assert_eq!(attributes.get(MESSAGE_TYPE_HEADER).unwrap(), "RequestTeams");
    assert_eq!(attributes.get(SENDER_ID_HEADER).unwrap(), "node-1");
    assert_eq!(attributes.get(RECIPIENT_ID_HEADER).unwrap(), "");

    let decoded = MessageCodec::decode(&wire).unwrap();
    assert_eq!(decoded.data, None);
    assert_eq!(decoded, original);
}

#[test]
fn headers_round_trip_through_attribute_bag() {
    let headers = WireHeaders {
        message_type: "ScrumTeamMessage".to_string(),
        message_subtype: Some("ScrumTeamMemberMessage".to_string()),
        sender_id: "node-1".to_string(),
        recipient_id: "node-2".to_string(),
    };
    let recovered = WireHeaders::from_attributes(&headers.to_attributes()).unwrap();
    assert_eq!(recovered, headers);
}
