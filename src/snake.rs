use crate::Coords;
use crate::rect::Rect;
use Direction::*;

/// Fixed cell size, shared by segment dimensions and the per-tick step.
pub const EXTENT: i32 = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// One grid cell of the snake's body. Positions are always multiples of
/// EXTENT; advancing never checks bounds, walls are tested externally.
#[derive(Copy, Clone, Debug)]
pub struct Segment {
    position: Coords,
    direction: Direction,
}

impl Segment {
    pub fn new(position: Coords, direction: Direction) -> Self {
        Segment { position, direction }
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn advance(&mut self) {
        match self.direction {
            Up => self.position.1 -= EXTENT,
            Down => self.position.1 += EXTENT,
            Left => self.position.0 -= EXTENT,
            Right => self.position.0 += EXTENT,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.0, self.position.1, EXTENT, EXTENT)
    }
}

/// Ordered chain of segments, index 0 = head. Never empty.
pub struct SnakeBody {
    segments: Vec<Segment>,
}

impl SnakeBody {
    pub fn new(position: Coords, direction: Direction) -> Self {
        SnakeBody { segments: vec![Segment::new(position, direction)] }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    /// Steers the head. A request equal to the exact reverse of the current
    /// heading is dropped so the head can never fold back onto its neighbor.
    pub fn set_direction(&mut self, new_direction: Direction) {
        let head = &mut self.segments[0];
        if new_direction != head.direction().opposite() {
            head.set_direction(new_direction);
        }
    }

    /// Moves the whole chain one step. Each segment first moves with the
    /// direction it picked up last tick, then inherits the direction its
    /// predecessor had before the predecessor's own move this tick. A single
    /// carried variable gives every segment a one-tick propagation lag, so
    /// the body traces the head's path with no gaps and no overlaps.
    pub fn advance(&mut self) {
        let mut carried = self.segments[0].direction();
        self.segments[0].advance();

        for segment in &mut self.segments[1..] {
            let own = segment.direction();
            segment.advance();
            segment.set_direction(carried);
            carried = own;
        }
    }

    /// Appends a new tail segment one EXTENT behind the current tail,
    /// trailing it in the same direction. It starts exactly adjacent to the
    /// old tail and falls into the follow-the-leader chain on the next tick.
    pub fn grow(&mut self) {
        let tail = self.segments.last().unwrap();
        let direction = tail.direction();
        let (x, y) = tail.position();

        let position = match direction {
            Up => (x, y + EXTENT),
            Down => (x, y - EXTENT),
            Left => (x + EXTENT, y),
            Right => (x - EXTENT, y),
        };

        self.segments.push(Segment::new(position, direction));
    }

    pub fn head_char(&self) -> char {
        match self.head().direction() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_adjacent(body: &SnakeBody) {
        for pair in body.segments().windows(2) {
            let (ax, ay) = pair[0].position();
            let (bx, by) = pair[1].position();
            let (dx, dy) = ((ax - bx).abs(), (ay - by).abs());
            assert!(
                (dx == EXTENT && dy == 0) || (dx == 0 && dy == EXTENT),
                "segments at ({}, {}) and ({}, {}) are not adjacent",
                ax, ay, bx, by
            );
        }
    }

    /// Builds a straight snake of `len` segments headed `direction`.
    fn snake_of_len(position: Coords, direction: Direction, len: usize) -> SnakeBody {
        let mut body = SnakeBody::new(position, direction);
        for _ in 1..len {
            body.grow();
        }
        body
    }

    #[test]
    fn segment_advances_one_extent_in_each_direction() {
        for (direction, expected) in [
            (Up, (90, 90 - EXTENT)),
            (Down, (90, 90 + EXTENT)),
            (Left, (90 - EXTENT, 90)),
            (Right, (90 + EXTENT, 90)),
        ]
        .iter()
        {
            let mut segment = Segment::new((90, 90), *direction);
            segment.advance();
            assert_eq!(segment.position(), *expected);
        }
    }

    #[test]
    fn single_segment_moves_up_three_ticks() {
        let mut body = SnakeBody::new((90, 90), Up);
        for _ in 0..3 {
            body.advance();
        }
        assert_eq!(body.head().position(), (90, 90 - 3 * EXTENT));
        assert_eq!(body.head().direction(), Up);
    }

    #[test]
    fn reversal_is_rejected_and_previous_direction_persists() {
        let mut body = SnakeBody::new((90, 90), Right);
        body.set_direction(Left);
        assert_eq!(body.head().direction(), Right);

        body.advance();
        assert_eq!(body.head().position(), (90 + EXTENT, 90));
    }

    #[test]
    fn perpendicular_turns_are_accepted() {
        let mut body = SnakeBody::new((90, 90), Right);
        body.set_direction(Down);
        assert_eq!(body.head().direction(), Down);
    }

    #[test]
    fn set_direction_is_idempotent_within_a_tick() {
        let mut once = SnakeBody::new((90, 90), Right);
        once.set_direction(Down);
        once.advance();

        let mut twice = SnakeBody::new((90, 90), Right);
        twice.set_direction(Down);
        twice.set_direction(Down);
        twice.advance();

        assert_eq!(once.head().position(), twice.head().position());
        assert_eq!(once.head().direction(), twice.head().direction());
    }

    #[test]
    fn grow_appends_behind_the_tail() {
        let mut body = SnakeBody::new((90, 90), Right);
        body.grow();

        assert_eq!(body.segments().len(), 2);
        // Tail trails a rightbound snake on the left.
        assert_eq!(body.segments()[1].position(), (90 - EXTENT, 90));
        assert_eq!(body.segments()[1].direction(), Right);
        assert_adjacent(&body);
    }

    #[test]
    fn grow_never_overlaps_the_body() {
        let mut body = snake_of_len((150, 150), Up, 4);
        body.grow();

        assert_eq!(body.segments().len(), 5);
        let positions: Vec<Coords> = body.segments().iter().map(|s| s.position()).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in positions[i + 1..].iter() {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn turn_propagates_one_segment_per_tick() {
        let mut body = snake_of_len((90, 90), Right, 3);

        body.set_direction(Down);
        body.advance();
        // Head turns immediately, the body is still finishing its old path.
        assert_eq!(body.segments()[0].position(), (90, 90 + EXTENT));
        assert_eq!(body.segments()[1].position(), (90, 90));
        assert_eq!(body.segments()[1].direction(), Down);
        assert_eq!(body.segments()[2].position(), (90 - EXTENT, 90));
        assert_eq!(body.segments()[2].direction(), Right);
        assert_adjacent(&body);

        body.advance();
        // Segment 1 moves down this tick, segment 2 reaches the corner.
        assert_eq!(body.segments()[1].position(), (90, 90 + EXTENT));
        assert_eq!(body.segments()[2].position(), (90, 90));
        assert_eq!(body.segments()[2].direction(), Down);
        assert_adjacent(&body);

        body.advance();
        // Segment 2 moves down the tick after; the chain is a column again.
        assert_eq!(body.segments()[0].position(), (90, 90 + 3 * EXTENT));
        assert_eq!(body.segments()[1].position(), (90, 90 + 2 * EXTENT));
        assert_eq!(body.segments()[2].position(), (90, 90 + EXTENT));
        assert_adjacent(&body);
    }

    #[test]
    fn adjacency_holds_under_arbitrary_turn_sequences() {
        let mut body = snake_of_len((300, 300), Right, 6);
        let turns = [
            Some(Down), None, Some(Left), None, None, Some(Up),
            Some(Right), None, Some(Up), Some(Left), None, Some(Down),
        ];

        for turn in turns.iter() {
            if let Some(direction) = turn {
                body.set_direction(*direction);
            }
            body.advance();
            assert_adjacent(&body);
        }
    }

    #[test]
    fn positions_stay_grid_aligned() {
        let mut body = snake_of_len((150, 150), Left, 3);
        for turn in [Some(Up), None, Some(Right), None, Some(Down)].iter() {
            if let Some(direction) = turn {
                body.set_direction(*direction);
            }
            body.advance();
            for segment in body.segments() {
                let (x, y) = segment.position();
                assert_eq!(x % EXTENT, 0);
                assert_eq!(y % EXTENT, 0);
            }
        }
    }
}
