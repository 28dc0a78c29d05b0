//! Elimination chunks across every header layout, read through a stream.

use killfeed_chunk::{ChunkEvents, ChunkPayload, GROUP_PLAYER_ELIM, METADATA_MATCH_STATS};
use killfeed_core::{NetId, PlayerRef, ReplayHeader, ReplayStream, Vector3, Weapon, WeaponTable};
use killfeed_test_utils::{ChunkBuilder, EliminationChunk, Player, ReplayBuilder};

fn weapons() -> WeaponTable {
    [(1, "Pistol"), (2, "Shotgun")].into_iter().collect()
}

fn players_for(header: &ReplayHeader) -> (Player, Player, PlayerRef, PlayerRef) {
    if header.uses_tagged_players() {
        (
            Player::Id([0xAB; 16]),
            Player::Name("Sniper".into()),
            PlayerRef::Id(NetId([0xAB; 16])),
            PlayerRef::Name("Sniper".into()),
        )
    } else {
        (
            Player::Plain("victim".into()),
            Player::Plain("Sniper".into()),
            PlayerRef::Name("victim".into()),
            PlayerRef::Name("Sniper".into()),
        )
    }
}

#[test]
fn every_layout_decodes_the_same_record() {
    let headers = [
        ReplayHeader::new(24, 20, 0),
        ReplayHeader::new(16, 12, 1),
        ReplayHeader::new(8, 3, 0),
        ReplayHeader::new(8, 4, 2),
        ReplayHeader::new(8, 7, 40),
    ];
    for header in headers {
        let (victim, killer, want_victim, want_killer) = players_for(&header);
        let body = EliminationChunk {
            header,
            eliminated: victim,
            eliminator: killer,
            gun_type: 2,
            knocked: true,
            eliminated_location: Some([0.0, 0.0, 0.0]),
            eliminator_location: Some([3000.0, 4000.0, 0.0]),
            distance: Some(50.0),
            trailing: vec![],
        }
        .encode();
        let (data, chunks) = ReplayBuilder::new()
            .padding(16)
            .chunk(GROUP_PLAYER_ELIM, "", Some(61_250), body)
            .build();

        let mut stream = ReplayStream::new(data, header);
        let table = weapons();
        let events: Vec<_> = ChunkEvents::new(&mut stream, chunks.iter(), &table)
            .collect::<Result<_, _>>()
            .unwrap_or_else(|e| panic!("{header:?}: {e}"));
        let elim = events[0].elimination().unwrap();

        assert_eq!(elim.eliminated.as_ref(), Some(&want_victim), "{header:?}");
        assert_eq!(elim.eliminator.as_ref(), Some(&want_killer), "{header:?}");
        assert_eq!(elim.gun_type, Weapon::Named("Shotgun".into()));
        assert!(elim.knocked);
        assert_eq!(elim.eliminated_location, Some(Vector3::new(0.0, 0.0, 0.0)));
        assert_eq!(
            elim.eliminator_location,
            Some(Vector3::new(3000.0, 4000.0, 0.0))
        );
        assert_eq!(elim.distance, Some(50.0));
        assert_eq!(elim.time_seconds, Some(61.25));
        assert_eq!(stream.offset(), chunks[0].end_bit());
    }
}

#[test]
fn legacy_wide_names_decode() {
    let header = ReplayHeader::new(8, 3, 1);
    let body = ChunkBuilder::new()
        .zeros(12)
        .wide_string("Jörð")
        .string("k")
        .u8(1)
        .bool(false)
        .build();
    let (data, chunks) = ReplayBuilder::new()
        .chunk(GROUP_PLAYER_ELIM, "", None, body)
        .build();
    let mut stream = ReplayStream::new(data, header);
    let table = weapons();
    let event = ChunkEvents::new(&mut stream, chunks.iter(), &table)
        .next()
        .unwrap()
        .unwrap();
    let elim = event.elimination().unwrap();
    assert_eq!(elim.eliminated, Some(PlayerRef::Name("Jörð".into())));
    assert_eq!(elim.gun_type, Weapon::Named("Pistol".into()));
    assert_eq!(elim.time_seconds, None);
}

#[test]
fn mixed_chunk_sequence_keeps_descriptor_order() {
    let header = ReplayHeader::new(23, 19, 0);
    let elim = EliminationChunk {
        header,
        eliminated: Player::Bot,
        eliminator: Player::Name("a".into()),
        gun_type: 9,
        ..EliminationChunk::default()
    }
    .encode();
    let mut stats = ChunkBuilder::new().zeros(4).f32(0.5);
    for v in [1, 4, 300, 20, 0, 150, 900, 1200, 800, 50_000] {
        stats = stats.u32(v);
    }
    let (data, chunks) = ReplayBuilder::new()
        .chunk(GROUP_PLAYER_ELIM, "", Some(1_000), elim.clone())
        .padding(5)
        .chunk("stats", METADATA_MATCH_STATS, None, stats.build())
        .chunk(GROUP_PLAYER_ELIM, "", Some(2_000), elim)
        .build();

    let mut stream = ReplayStream::new(data, header);
    let table = weapons();
    let events: Vec<_> = ChunkEvents::new(&mut stream, chunks.iter(), &table)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].elimination().unwrap().gun_type, Weapon::Code(9));
    match &events[1].payload {
        ChunkPayload::MatchStats(s) => {
            assert_eq!(s.eliminations, 4);
            assert_eq!(s.damage_to_players(), 320);
            assert_eq!(s.total_traveled, 50_000);
        }
        other => panic!("expected match stats, got {other:?}"),
    }
    assert_eq!(events[2].elimination().unwrap().time_seconds, Some(2.0));
}
