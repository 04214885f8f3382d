/// 1-based line and column, the way editors and lint reports count them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Clone, Debug)]
pub struct SourceMap<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> SourceMap<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = Vec::new();
        line_starts.push(0);
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        // Columns count characters, falling back to bytes inside a code point.
        let column = match self.source.get(line_start..offset) {
            Some(prefix) => prefix.chars().count(),
            None => offset - line_start,
        };
        Position {
            line: line + 1,
            column: column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Position, SourceMap};

    #[test]
    fn positions_are_line_based() {
        let source = "a\nb\n";
        let map = SourceMap::new(source);

        assert_eq!(map.position(0), Position::new(1, 1));
        assert_eq!(map.position(1), Position::new(1, 2));
        assert_eq!(map.position(2), Position::new(2, 1));
        assert_eq!(map.position(3), Position::new(2, 2));
        assert_eq!(map.position(4), Position::new(3, 1));
    }

    #[test]
    fn columns_count_characters() {
        let source = "é [here](x)";
        let map = SourceMap::new(source);
        // "é" is two bytes but one column.
        assert_eq!(map.position(3), Position::new(1, 3));
        assert_eq!(map.position(100), Position::new(1, 12));
    }
}
