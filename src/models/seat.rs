use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Фиксированная сетка зала: 8 рядов по 10 мест, для всех фильмов
pub const GRID_ROWS: i32 = 8;
pub const GRID_COLS: i32 = 10;

/// Seat coordinate inside the fixed grid.
///
/// The wire format is `"row-col"` (two integers joined by a hyphen), parsed
/// once at the API boundary; everything past that works with this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatPos {
    pub row: i32,
    pub col: i32,
}

impl SeatPos {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        (0..GRID_ROWS).contains(&self.row) && (0..GRID_COLS).contains(&self.col)
    }
}

impl fmt::Display for SeatPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat coordinate '{0}', expected 'row-col'")]
pub struct ParseSeatError(pub String);

impl FromStr for SeatPos {
    type Err = ParseSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s.split_once('-').ok_or_else(|| ParseSeatError(s.to_string()))?;
        let row = row.trim().parse().map_err(|_| ParseSeatError(s.to_string()))?;
        let col = col.trim().parse().map_err(|_| ParseSeatError(s.to_string()))?;
        Ok(SeatPos { row, col })
    }
}

/// Booked/free flags for one movie, always 8x10.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatGrid([[bool; GRID_COLS as usize]; GRID_ROWS as usize]);

impl SeatGrid {
    pub fn is_booked(&self, pos: SeatPos) -> bool {
        // Координаты вне сетки считаем занятыми - бронировать их нельзя
        if !pos.in_bounds() {
            return true;
        }
        self.0[pos.row as usize][pos.col as usize]
    }

    // Координаты вне сетки молча игнорируются
    pub fn set(&mut self, pos: SeatPos, booked: bool) {
        if pos.in_bounds() {
            self.0[pos.row as usize][pos.col as usize] = booked;
        }
    }

    pub fn available(&self) -> usize {
        self.0
            .iter()
            .flat_map(|row| row.iter())
            .filter(|booked| !**booked)
            .count()
    }

    pub fn booked(&self) -> usize {
        (GRID_ROWS * GRID_COLS) as usize - self.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format() {
        assert_eq!("0-0".parse::<SeatPos>().unwrap(), SeatPos::new(0, 0));
        assert_eq!("7-9".parse::<SeatPos>().unwrap(), SeatPos::new(7, 9));
        assert_eq!("12-3".parse::<SeatPos>().unwrap(), SeatPos::new(12, 3));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!("".parse::<SeatPos>().is_err());
        assert!("3".parse::<SeatPos>().is_err());
        assert!("a-b".parse::<SeatPos>().is_err());
        assert!("1-2-3".parse::<SeatPos>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let pos = SeatPos::new(3, 7);
        assert_eq!(pos.to_string().parse::<SeatPos>().unwrap(), pos);
    }

    #[test]
    fn bounds_follow_fixed_grid() {
        assert!(SeatPos::new(7, 9).in_bounds());
        assert!(!SeatPos::new(8, 0).in_bounds());
        assert!(!SeatPos::new(0, 10).in_bounds());
        assert!(!SeatPos::new(-1, 0).in_bounds());
    }

    #[test]
    fn grid_ignores_out_of_bounds_writes() {
        let mut grid = SeatGrid::default();
        grid.set(SeatPos::new(9, 0), true);
        grid.set(SeatPos::new(0, 11), true);
        assert_eq!(grid.available(), 80);

        grid.set(SeatPos::new(2, 4), true);
        assert_eq!(grid.available(), 79);
        assert!(grid.is_booked(SeatPos::new(2, 4)));
    }

    #[test]
    fn out_of_bounds_never_reads_as_free() {
        let grid = SeatGrid::default();
        assert!(grid.is_booked(SeatPos::new(8, 0)));
        assert!(grid.is_booked(SeatPos::new(0, 10)));
    }
}
