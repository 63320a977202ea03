//! Character-grid rendering of a laid-out tree
//!
//! Node labels are anchored at `(x - min_x) * width` on line `y * row_height`,
//! where `width` is the configured cell width widened to the longest label plus
//! one blank. The `row_height - 1` lines between two levels carry `/` and `\`
//! connectors interpolated from parent to child.

use std::collections::HashSet;

use colored::Colorize;
use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::TreeView;
use crate::config::{CanvasConfig, MAX_CELL_WIDTH, MAX_ROW_HEIGHT};
use crate::domain::Position;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    ch: Option<char>,
    marked: bool,
}

/// A growable grid of characters with a highlight mask.
#[derive(Debug, Default)]
pub struct Canvas {
    lines: Vec<Vec<Cell>>,
}

impl Canvas {
    /// Draws every node and edge of `view`; nodes in `highlight`, and edges
    /// whose both ends are in it, are marked.
    #[instrument(level = "debug", skip(view, highlight))]
    pub fn render(view: &TreeView, canvas: &CanvasConfig, highlight: &[Index]) -> Self {
        let mut grid = Self::default();
        let Some(bounds) = view.layout.bounds() else {
            return grid;
        };
        let marked: HashSet<Index> = highlight.iter().copied().collect();

        let label_width = view
            .layout
            .iter()
            .map(|pos| pos.key.to_string().len())
            .max()
            .unwrap_or(0);
        let cell_width = canvas.cell_width.clamp(1, MAX_CELL_WIDTH).max(label_width + 1);
        let row_height = canvas.row_height.clamp(1, MAX_ROW_HEIGHT);

        let column = |pos: &Position| (pos.x - bounds.min_x) as usize * cell_width;
        let line = |pos: &Position| pos.y * row_height;

        for pos in &view.layout {
            let (row, col) = (line(pos), column(pos));
            for (offset, ch) in pos.key.to_string().chars().enumerate() {
                grid.put(row, col + offset, ch, marked.contains(&pos.index));
            }
        }

        for (parent, child) in view.layout.edges(&view.tree) {
            let on_route = marked.contains(&parent.index) && marked.contains(&child.index);
            let (from, to) = (column(&parent) as i64, column(&child) as i64);
            let glyph = match to.cmp(&from) {
                std::cmp::Ordering::Less => '/',
                std::cmp::Ordering::Greater => '\\',
                std::cmp::Ordering::Equal => '|',
            };
            let steps = row_height as i64;
            for step in 1..steps {
                let col = from + (to - from) * step / steps;
                grid.put_if_blank(line(&parent) + step as usize, col as usize, glyph, on_route);
            }
        }

        debug!(lines = grid.lines.len(), cell_width, "canvas rendered");
        grid
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        if self.lines.len() <= row {
            self.lines.resize_with(row + 1, Vec::new);
        }
        let line = &mut self.lines[row];
        if line.len() <= col {
            line.resize(col + 1, Cell::default());
        }
        &mut line[col]
    }

    fn put(&mut self, row: usize, col: usize, ch: char, marked: bool) {
        *self.cell_mut(row, col) = Cell {
            ch: Some(ch),
            marked,
        };
    }

    // labels win over connectors
    fn put_if_blank(&mut self, row: usize, col: usize, ch: char, marked: bool) {
        let cell = self.cell_mut(row, col);
        if cell.ch.is_none() {
            *cell = Cell {
                ch: Some(ch),
                marked,
            };
        }
    }

    /// Number of text lines.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn to_plain_string(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|cell| cell.ch.unwrap_or(' '))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .join("\n")
    }

    /// Like [`Canvas::to_plain_string`], with marked cells in bold green.
    pub fn to_colored_string(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let used = line
                    .iter()
                    .rposition(|cell| cell.ch.is_some_and(|ch| ch != ' '))
                    .map_or(0, |last| last + 1);
                line[..used]
                    .iter()
                    .chunk_by(|cell| cell.marked)
                    .into_iter()
                    .map(|(marked, run)| {
                        let text: String = run.map(|cell| cell.ch.unwrap_or(' ')).collect();
                        if marked {
                            text.green().bold().to_string()
                        } else {
                            text
                        }
                    })
                    .collect::<String>()
            })
            .join("\n")
    }
}
