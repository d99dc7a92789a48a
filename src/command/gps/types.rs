//! Argument and parameter types used by GPS Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum GpsPower {
    Off = 0,
    On = 1,
}

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum LocationSource {
    /// Position estimated from the serving cell
    CellTower = 1,
    /// Position from the GNSS receiver
    Gps = 2,
}
