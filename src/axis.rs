//! # Axis catalog
//!
//! Static table mapping the integer axis codes found in a trajectory log's
//! axis enumeration to their semantic channel, plus the physical sample
//! multiplicity rule for each channel.
//!
//! Every channel carries exactly one (Expected, Actual) sample pair per
//! snapshot, except the MLC channel which carries one pair per carriage and
//! per leaf. Codes absent from this catalog are still consumed by the decoder
//! to keep the byte cursor aligned, but contribute no stored samples.

/// Semantic channel of one sampled axis.
///
/// The discriminants are **not** the wire codes; use [`Axis::code`] and
/// [`Axis::from_code`] for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    CollRtn,
    GantryRtn,
    Y1,
    Y2,
    X1,
    X2,
    CouchVrt,
    CouchLng,
    CouchLat,
    CouchRtn,
    CouchPit,
    CouchRol,
    Mu,
    BeamHold,
    ControlPoint,
    Mlc,
    TargetPosition,
    TrackingTarget,
    TrackingBase,
    TrackingPhase,
    TrackingConformity,
}

impl Axis {
    /// All catalog entries, in wire-code order.
    pub const ALL: [Axis; 21] = [
        Axis::CollRtn,
        Axis::GantryRtn,
        Axis::Y1,
        Axis::Y2,
        Axis::X1,
        Axis::X2,
        Axis::CouchVrt,
        Axis::CouchLng,
        Axis::CouchLat,
        Axis::CouchRtn,
        Axis::CouchPit,
        Axis::CouchRol,
        Axis::Mu,
        Axis::BeamHold,
        Axis::ControlPoint,
        Axis::Mlc,
        Axis::TargetPosition,
        Axis::TrackingTarget,
        Axis::TrackingBase,
        Axis::TrackingPhase,
        Axis::TrackingConformity,
    ];

    /// Resolve a wire code from the axis enumeration.
    ///
    /// Return
    /// ------
    /// * `Some(Axis)` for a catalog code, `None` for anything else.
    pub fn from_code(code: i32) -> Option<Axis> {
        match code {
            0 => Some(Axis::CollRtn),
            1 => Some(Axis::GantryRtn),
            2 => Some(Axis::Y1),
            3 => Some(Axis::Y2),
            4 => Some(Axis::X1),
            5 => Some(Axis::X2),
            6 => Some(Axis::CouchVrt),
            7 => Some(Axis::CouchLng),
            8 => Some(Axis::CouchLat),
            9 => Some(Axis::CouchRtn),
            10 => Some(Axis::CouchPit),
            11 => Some(Axis::CouchRol),
            40 => Some(Axis::Mu),
            41 => Some(Axis::BeamHold),
            42 => Some(Axis::ControlPoint),
            50 => Some(Axis::Mlc),
            60 => Some(Axis::TargetPosition),
            61 => Some(Axis::TrackingTarget),
            62 => Some(Axis::TrackingBase),
            63 => Some(Axis::TrackingPhase),
            64 => Some(Axis::TrackingConformity),
            _ => None,
        }
    }

    /// Wire code of this axis in the log's axis enumeration.
    pub fn code(self) -> i32 {
        match self {
            Axis::CollRtn => 0,
            Axis::GantryRtn => 1,
            Axis::Y1 => 2,
            Axis::Y2 => 3,
            Axis::X1 => 4,
            Axis::X2 => 5,
            Axis::CouchVrt => 6,
            Axis::CouchLng => 7,
            Axis::CouchLat => 8,
            Axis::CouchRtn => 9,
            Axis::CouchPit => 10,
            Axis::CouchRol => 11,
            Axis::Mu => 40,
            Axis::BeamHold => 41,
            Axis::ControlPoint => 42,
            Axis::Mlc => 50,
            Axis::TargetPosition => 60,
            Axis::TrackingTarget => 61,
            Axis::TrackingBase => 62,
            Axis::TrackingPhase => 63,
            Axis::TrackingConformity => 64,
        }
    }

    /// Human-readable channel name, as used in diagnostics and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Axis::CollRtn => "Collimator Rtn",
            Axis::GantryRtn => "Gantry Rtn",
            Axis::Y1 => "Y1",
            Axis::Y2 => "Y2",
            Axis::X1 => "X1",
            Axis::X2 => "X2",
            Axis::CouchVrt => "Couch Vrt",
            Axis::CouchLng => "Couch Lng",
            Axis::CouchLat => "Couch Lat",
            Axis::CouchRtn => "Couch Rtn",
            Axis::CouchPit => "Couch Pit",
            Axis::CouchRol => "Couch Rol",
            Axis::Mu => "MU",
            Axis::BeamHold => "Beam Hold",
            Axis::ControlPoint => "Control Point",
            Axis::Mlc => "MLC",
            Axis::TargetPosition => "Target Position",
            Axis::TrackingTarget => "Tracking Target",
            Axis::TrackingBase => "Tracking Base",
            Axis::TrackingPhase => "Tracking Phase",
            Axis::TrackingConformity => "Tracking Conformity Index",
        }
    }

    /// Whether this channel carries more than one physical sample per snapshot.
    ///
    /// Only the MLC channel does: two carriage pairs followed by one pair per
    /// leaf. Every other channel is sampled once.
    pub fn is_multi_sample(self) -> bool {
        matches!(self, Axis::Mlc)
    }
}
