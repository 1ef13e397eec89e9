/// Control hazards: predict-not-taken squashes and delayed branches.
pub mod control_hazards;



/// Pipeline register clear/enable behaviour.
pub mod latches;

/// Load-use and unforwarded data hazards.
pub mod load_use;

/// Randomized checks of the hazard and forwarding units.
pub mod properties;
