use thiserror::Error;

/// How a statistic's value cell is coerced to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Decimal,
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatScope {
    Club,
    Player,
}

#[derive(Debug, Clone, Copy)]
pub struct StatDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub value_kind: ValueKind,
    // Minimum plausible row count for the fallback strategies. Club ranking
    // pages list the whole league; player pages are per-club and shorter.
    pub min_rows: usize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown statistic identifier: {0}")]
pub struct UnknownStatistic(pub String);

const CLUB_MIN_ROWS: usize = 10;
const PLAYER_MIN_ROWS: usize = 3;

macro_rules! stat {
    ($id:literal, $name:literal, $kind:ident, $min:expr) => {
        StatDescriptor {
            id: $id,
            display_name: $name,
            value_kind: ValueKind::$kind,
            min_rows: $min,
        }
    };
}

pub const CLUB_STATS: &[StatDescriptor] = &[
    stat!("AKURASIUMPAN", "Akurasi Umpan", Percentage, CLUB_MIN_ROWS),
    stat!("AKURASITEMBAKAN", "Akurasi Tembakan", Percentage, CLUB_MIN_ROWS),
    stat!("KARTUKUNING", "Kartu Kuning", Integer, CLUB_MIN_ROWS),
    stat!("KARTUMERAH", "Kartu Merah", Integer, CLUB_MIN_ROWS),
    stat!("OFFSIDE", "Offside", Integer, CLUB_MIN_ROWS),
    stat!("UMPANGAGAL", "Umpan Gagal", Integer, CLUB_MIN_ROWS),
    stat!("UMPANSUKSES", "Umpan Sukses", Integer, CLUB_MIN_ROWS),
    stat!("PELANGGARAN", "Pelanggaran", Integer, CLUB_MIN_ROWS),
    stat!("PENGUASAANBOLAPERSEN", "Penguasaan Bola", Percentage, CLUB_MIN_ROWS),
    stat!("TEKELSUKSES", "Tekel Sukses", Integer, CLUB_MIN_ROWS),
    stat!("TEMBAKANDIBLOK", "Tembakan Diblok", Integer, CLUB_MIN_ROWS),
    stat!("TEMBAKANKEGAWANG", "Tembakan ke Gawang", Integer, CLUB_MIN_ROWS),
    stat!("TENDANGANSUDUT", "Tendangan Sudut", Integer, CLUB_MIN_ROWS),
    stat!("TOTALUMPAN", "Total Umpan", Integer, CLUB_MIN_ROWS),
    stat!("TOTALTEMBAKAN", "Total Tembakan", Integer, CLUB_MIN_ROWS),
];

pub const PLAYER_STATS: &[StatDescriptor] = &[
    stat!("ASSIST", "Assist", Integer, PLAYER_MIN_ROWS),
    stat!("BALL_RECOVERY", "Ball Recovery", Integer, PLAYER_MIN_ROWS),
    stat!("BLOCK", "Block", Integer, PLAYER_MIN_ROWS),
    stat!("BLOCK_CROSS", "Block Cross", Integer, PLAYER_MIN_ROWS),
    stat!("CLEARANCE", "Clearance", Integer, PLAYER_MIN_ROWS),
    stat!("CREATE_CHANCE", "Create Chance", Integer, PLAYER_MIN_ROWS),
    stat!("CROS", "Cross", Integer, PLAYER_MIN_ROWS),
    stat!("DRIBBLE_SUCCESS", "Dribble Success", Integer, PLAYER_MIN_ROWS),
    stat!("FOUL", "Foul", Integer, PLAYER_MIN_ROWS),
    stat!("FOULED", "Fouled", Integer, PLAYER_MIN_ROWS),
    stat!("FREE_KICK", "Free Kick", Integer, PLAYER_MIN_ROWS),
    stat!("GOAL", "Goal", Integer, PLAYER_MIN_ROWS),
    stat!("HEADER_WON", "Header Won", Integer, PLAYER_MIN_ROWS),
    stat!("INTERCEPT", "Intercept", Integer, PLAYER_MIN_ROWS),
    stat!("OWN_GOAL", "Own Goal", Integer, PLAYER_MIN_ROWS),
    stat!("PASSING", "Passing", Integer, PLAYER_MIN_ROWS),
    stat!("PENALTY_GOAL", "Penalty Goal", Integer, PLAYER_MIN_ROWS),
    stat!("SAVES", "Saves", Integer, PLAYER_MIN_ROWS),
    stat!("SHOOT_OFF_TARGET", "Shoot Off Target", Integer, PLAYER_MIN_ROWS),
    stat!("SHOOT_ON_TARGET", "Shoot On Target", Integer, PLAYER_MIN_ROWS),
    stat!("TACKLE", "Tackle", Integer, PLAYER_MIN_ROWS),
    stat!("YELLOW_CARD", "Yellow Card", Integer, PLAYER_MIN_ROWS),
];

/// All descriptors for a scope, in canonical display order for exports.
pub fn all(scope: StatScope) -> &'static [StatDescriptor] {
    match scope {
        StatScope::Club => CLUB_STATS,
        StatScope::Player => PLAYER_STATS,
    }
}

pub fn lookup(scope: StatScope, id: &str) -> Result<&'static StatDescriptor, UnknownStatistic> {
    all(scope)
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| UnknownStatistic(id.to_string()))
}

/// Look up an identifier in either catalog, clubs first.
pub fn lookup_any(id: &str) -> Result<(StatScope, &'static StatDescriptor), UnknownStatistic> {
    if let Ok(desc) = lookup(StatScope::Club, id) {
        return Ok((StatScope::Club, desc));
    }
    lookup(StatScope::Player, id).map(|d| (StatScope::Player, d))
}

pub fn display_name_to_id(scope: StatScope, display_name: &str) -> Option<&'static str> {
    all(scope)
        .iter()
        .find(|d| d.display_name == display_name)
        .map(|d| d.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_sizes_are_fixed() {
        assert_eq!(CLUB_STATS.len(), 15);
        assert_eq!(PLAYER_STATS.len(), 22);
    }

    #[test]
    fn lookup_known_and_unknown() {
        let desc = lookup(StatScope::Club, "PENGUASAANBOLAPERSEN").unwrap();
        assert_eq!(desc.display_name, "Penguasaan Bola");
        assert_eq!(desc.value_kind, ValueKind::Percentage);

        let err = lookup(StatScope::Club, "GOAL").unwrap_err();
        assert_eq!(err, UnknownStatistic("GOAL".to_string()));

        let (scope, desc) = lookup_any("GOAL").unwrap();
        assert_eq!(scope, StatScope::Player);
        assert_eq!(desc.display_name, "Goal");
    }

    #[test]
    fn identifiers_are_unique() {
        for table in [CLUB_STATS, PLAYER_STATS] {
            for (i, a) in table.iter().enumerate() {
                for b in &table[i + 1..] {
                    assert_ne!(a.id, b.id);
                    assert_ne!(a.display_name, b.display_name);
                }
            }
        }
    }

    #[test]
    fn display_name_round_trip() {
        assert_eq!(
            display_name_to_id(StatScope::Player, "Shoot On Target"),
            Some("SHOOT_ON_TARGET")
        );
        assert_eq!(display_name_to_id(StatScope::Player, "Possession"), None);
    }
}
