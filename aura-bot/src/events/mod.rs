pub mod alerts;
pub mod antinuke;
pub mod joins;
pub mod welcome;
