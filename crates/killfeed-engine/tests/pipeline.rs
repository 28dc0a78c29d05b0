//! End-to-end parses: chunk stream plus property events through one pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use killfeed_chunk::{DecodeError, GROUP_PLAYER_ELIM, METADATA_MATCH_STATS, METADATA_TEAM_STATS};
use killfeed_core::{
    CanonicalElimination, ChunkDescriptor, NetId, PlayerRef, ReplayHeader, ReplayStream, Weapon,
    WeaponTable,
};
use killfeed_engine::{
    parse_eliminations, ExportNode, FieldExport, ParseConfig, ParseError, PropertyEvent,
    ReplayParse, ELIMINATION_SUMMARY_EVENT, FEED_UPDATE_EVENT,
};
use killfeed_test_utils::fixtures::hex_id;
use killfeed_test_utils::{
    ChunkBuilder, EliminationChunk, PayloadBuilder, Player, ReplayBuilder, XorCipher,
};
use serde_json::json;

const HEADER: ReplayHeader = ReplayHeader {
    engine_network_version: 24,
    major: 22,
    minor: 40,
};

fn config() -> ParseConfig {
    ParseConfig {
        weapons: [(1, "Pistol"), (4, "AssaultRifle")].into_iter().collect::<WeaponTable>(),
        ..ParseConfig::default()
    }
}

fn elim_body(victim: u8, killer: u8, gun: u8, knocked: bool) -> Vec<u8> {
    EliminationChunk {
        header: HEADER,
        eliminated: Player::Id([victim; 16]),
        eliminator: Player::Id([killer; 16]),
        gun_type: gun,
        knocked,
        ..EliminationChunk::default()
    }
    .encode()
}

fn id(b: u8) -> Option<PlayerRef> {
    Some(PlayerRef::Id(NetId([b; 16])))
}

#[test]
fn merges_both_sources_into_one_timeline() {
    let (data, chunks) = ReplayBuilder::new()
        .padding(32)
        .chunk(GROUP_PLAYER_ELIM, "", Some(30_000), elim_body(2, 1, 4, false))
        .chunk(GROUP_PLAYER_ELIM, "", Some(75_500), elim_body(3, 1, 9, true))
        .build();
    let mut stream = ReplayStream::new(data, HEADER);

    let events = vec![
        // Same elimination as the first chunk, seen a millisecond later.
        PropertyEvent::new(
            FEED_UPDATE_EVENT,
            PayloadBuilder::new()
                .killer(&hex_id(1))
                .victim(&hex_id(2))
                .knocked(false)
                .field("DistanceMetersSquared", json!(2500.0))
                .time(30.001)
                .build(),
        ),
        // Only the property path saw this one.
        PropertyEvent::new(
            ELIMINATION_SUMMARY_EVENT,
            PayloadBuilder::new()
                .killer(&hex_id(4))
                .victim("bot")
                .gun(json!(1))
                .distance(8.0)
                .build(),
        )
        .at(12.0),
        // Not an elimination event.
        PropertyEvent::new(
            "FortniteGame.AthenaPlayerState:OnSomethingElse",
            PayloadBuilder::new().killer("x").build(),
        ),
    ];

    let result = parse_eliminations(&mut stream, &chunks, events, config()).unwrap();

    assert_eq!(
        result.eliminations,
        vec![
            CanonicalElimination {
                killer: id(4),
                victim: Some(PlayerRef::Bot),
                weapon: Some(Weapon::Named("Pistol".into())),
                knocked: false,
                distance: Some(8.0),
                t: Some(12.0),
            },
            CanonicalElimination {
                killer: id(1),
                victim: id(2),
                weapon: Some(Weapon::Named("AssaultRifle".into())),
                knocked: false,
                distance: Some(50.0),
                t: Some(30.0),
            },
            CanonicalElimination {
                killer: id(1),
                victim: id(3),
                weapon: Some(Weapon::Code(9)),
                knocked: true,
                distance: None,
                t: Some(75.5),
            },
        ]
    );
    assert_eq!(result.stats.loose_matches, 1);
    assert_eq!(result.stats.raw_only, 1);
    assert_eq!(result.stats.property_only, 1);
    assert_eq!(result.chunk_events.len(), 2);
    assert!(result.property_eliminations.is_empty());
}

#[test]
fn either_event_name_alone_is_enough() {
    for name in [FEED_UPDATE_EVENT, ELIMINATION_SUMMARY_EVENT] {
        let mut stream = ReplayStream::new(vec![], HEADER);
        let event = PropertyEvent::new(
            name,
            PayloadBuilder::new().killer("a").victim("b").time(1.0).build(),
        );
        let result = parse_eliminations(&mut stream, &[], [event], config()).unwrap();
        assert_eq!(result.eliminations.len(), 1, "{name}");
        assert_eq!(result.eliminations[0].killer, Some(PlayerRef::Name("a".into())));
    }
}

#[test]
fn both_event_names_for_one_elimination_merge_with_the_chunk() {
    let (data, chunks) = ReplayBuilder::new()
        .chunk(GROUP_PLAYER_ELIM, "", Some(5_000), elim_body(2, 1, 1, false))
        .build();
    let mut stream = ReplayStream::new(data, HEADER);
    let payload = PayloadBuilder::new()
        .killer(&hex_id(1))
        .victim(&hex_id(2))
        .gun(json!(1))
        .time(5.0)
        .build();
    let events = [
        PropertyEvent::new(FEED_UPDATE_EVENT, payload.clone()),
        PropertyEvent::new(ELIMINATION_SUMMARY_EVENT, payload),
    ];
    let result = parse_eliminations(&mut stream, &chunks, events, config()).unwrap();
    // The chunk consumes one property record; the other has no chunk left.
    assert_eq!(result.stats.exact_matches, 1);
    assert_eq!(result.stats.property_only, 1);
    assert_eq!(result.eliminations.len(), 2);
}

#[test]
fn caller_listeners_run_after_normalizer() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut parse = ReplayParse::new(config()).unwrap();
    {
        let seen = Rc::clone(&seen);
        parse.subscribe(FEED_UPDATE_EVENT, move |_, result| {
            let latest = result.property_eliminations.last().cloned();
            seen.borrow_mut().push(latest);
        });
    }
    parse.dispatch(&PropertyEvent::new(
        FEED_UPDATE_EVENT,
        PayloadBuilder::new().killer("k").victim("v").distance(3.0).build(),
    ));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    let normalized = seen[0].as_ref().unwrap();
    assert_eq!(normalized.distance, Some(3.0));
    assert_eq!(normalized.victim, Some(PlayerRef::Name("v".into())));
}

#[test]
fn custom_event_names_replace_defaults() {
    let config = ParseConfig {
        elimination_events: vec!["Mod.State:OnKill".into()],
        ..config()
    };
    let mut stream = ReplayStream::new(vec![], HEADER);
    let events = [
        PropertyEvent::new("Mod.State:OnKill", PayloadBuilder::new().killer("a").build()),
        PropertyEvent::new(FEED_UPDATE_EVENT, PayloadBuilder::new().killer("b").build()),
    ];
    let result = parse_eliminations(&mut stream, &[], events, config).unwrap();
    assert_eq!(result.eliminations.len(), 1);
    assert_eq!(result.eliminations[0].killer, Some(PlayerRef::Name("a".into())));
}

#[test]
fn ignored_groups_never_reach_listeners() {
    let config = ParseConfig {
        elimination_events: vec!["PlayerPawn_Athena.PlayerPawn_Athena_C:OnKill".into()],
        ..config()
    };
    let mut stream = ReplayStream::new(vec![], HEADER);
    let event = PropertyEvent::new(
        "PlayerPawn_Athena.PlayerPawn_Athena_C:OnKill",
        PayloadBuilder::new().killer("a").build(),
    );
    let result = parse_eliminations(&mut stream, &[], [event], config).unwrap();
    assert!(result.eliminations.is_empty());
}

#[test]
fn statistics_chunks_pass_through() {
    let mut stats = ChunkBuilder::new().zeros(4).f32(0.31);
    for v in [2, 7, 1200, 140, 1, 300, 5000, 900, 450, 123_456] {
        stats = stats.u32(v);
    }
    let team = ChunkBuilder::new().i32(0).u32(1).u32(98).build();
    let (data, chunks) = ReplayBuilder::new()
        .chunk("stats", METADATA_MATCH_STATS, None, stats.build())
        .chunk("stats", METADATA_TEAM_STATS, None, team)
        .build();
    let mut stream = ReplayStream::new(data, HEADER);
    let result = parse_eliminations(&mut stream, &chunks, [], config()).unwrap();
    let stats = result.match_stats().unwrap();
    assert_eq!(stats.eliminations, 7);
    assert_eq!(stats.damage_to_players(), 1340);
    assert_eq!(result.team_stats().unwrap().position, 1);
    assert_eq!(result.team_stats().unwrap().total_players, 98);
    assert!(result.eliminations.is_empty());
}

#[test]
fn encrypted_replay_decodes_through_cipher() {
    let cipher = XorCipher(0xC3);
    let (data, chunks) = ReplayBuilder::new()
        .padding(9)
        .chunk(
            GROUP_PLAYER_ELIM,
            "",
            Some(2_000),
            cipher.apply(&elim_body(6, 5, 4, false)),
        )
        .build();
    let mut stream = ReplayStream::encrypted(data, HEADER, Some(Box::new(cipher)));
    let result = parse_eliminations(&mut stream, &chunks, [], config()).unwrap();
    assert_eq!(result.eliminations.len(), 1);
    assert_eq!(result.eliminations[0].killer, id(5));
    assert_eq!(result.eliminations[0].t, Some(2.0));
}

#[test]
fn truncated_chunk_aborts_the_parse() {
    let mut body = elim_body(1, 2, 3, false);
    body.truncate(body.len() - 2);
    let (data, chunks) = ReplayBuilder::new()
        .chunk(GROUP_PLAYER_ELIM, "", None, body)
        .build();
    let mut stream = ReplayStream::new(data, HEADER);
    let err = parse_eliminations(&mut stream, &chunks, [], config()).unwrap_err();
    match err {
        ParseError::Decode(DecodeError::MalformedChunk { chunk, error }) => {
            assert_eq!(chunk, chunks[0]);
            assert_eq!(error.field, "gun_type");
        }
        other => panic!("expected malformed chunk, got {other:?}"),
    }
}

#[test]
fn chunk_outside_stream_is_reported_with_descriptor() {
    let mut stream = ReplayStream::new(vec![0; 16], HEADER);
    let chunk = ChunkDescriptor::new(GROUP_PLAYER_ELIM, "", 64, 10);
    let err = parse_eliminations(&mut stream, &[chunk.clone()], [], config()).unwrap_err();
    match err {
        ParseError::Decode(e) => assert_eq!(e.chunk(), &chunk),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn caller_exports_override_defaults_in_registry() {
    let extra = FieldExport {
        path: Some(vec!["/Script/FortniteGame.FortPlayerDeathReport".into()]),
        export_name: Some("FortPlayerDeathReport".into()),
        export_type: Some("object".into()),
        ..FieldExport::default()
    };
    let config = config().with_field_exports([
        ExportNode::Group(vec![extra.clone().into(), ExportNode::Null]),
        FieldExport::default().into(),
    ]);
    let parse = ReplayParse::new(config).unwrap();
    let reg = parse.registry();
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.discarded(), 1);
    let overridden = reg.iter().nth(1).unwrap();
    assert_eq!(overridden, &extra);
}

#[test]
fn result_serializes_without_absent_fields() {
    let mut stream = ReplayStream::new(vec![], HEADER);
    let event = PropertyEvent::new(
        FEED_UPDATE_EVENT,
        PayloadBuilder::new().killer(&hex_id(0xab)).victim("bot").gun(json!(4)).build(),
    );
    let result = parse_eliminations(&mut stream, &[], [event], config()).unwrap();
    let value = serde_json::to_value(&result.eliminations).unwrap();
    assert_eq!(
        value,
        json!([{
            "killer": hex_id(0xab),
            "victim": "bot",
            "weapon": "AssaultRifle",
            "knocked": false
        }])
    );
}
