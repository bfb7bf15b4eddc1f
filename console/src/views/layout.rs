//! Pane layout
//!
//! Wide viewports show the list and the selected item side by side;
//! narrow ones show one pane at a time.

/// Narrowest viewport, in columns, that gets the split layout
pub const SPLIT_MIN_WIDTH: u16 = 160;

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLayout {
    Split { list_width: u16, detail_width: u16 },
    List { width: u16 },
    Detail { width: u16 },
}

impl PaneLayout {
    pub fn for_viewport(width: u16, has_selection: bool) -> Self {
        if width >= SPLIT_MIN_WIDTH {
            let list_width = (u32::from(width) * 2 / 5) as u16;
            let detail_width = width - list_width - SEPARATOR.len() as u16;
            PaneLayout::Split {
                list_width,
                detail_width,
            }
        } else if has_selection {
            PaneLayout::Detail { width }
        } else {
            PaneLayout::List { width }
        }
    }

    pub fn list_width(&self) -> Option<u16> {
        match *self {
            PaneLayout::Split { list_width, .. } => Some(list_width),
            PaneLayout::List { width } => Some(width),
            PaneLayout::Detail { .. } => None,
        }
    }

    pub fn detail_width(&self) -> Option<u16> {
        match *self {
            PaneLayout::Split { detail_width, .. } => Some(detail_width),
            PaneLayout::Detail { width } => Some(width),
            PaneLayout::List { .. } => None,
        }
    }

    /// Lay out already rendered panes
    pub fn compose(&self, list: &str, detail: Option<&str>) -> String {
        match (*self, detail) {
            (PaneLayout::Split { list_width, .. }, Some(detail)) => {
                side_by_side(list, detail, list_width as usize)
            }
            (PaneLayout::Detail { .. }, Some(detail)) => detail.to_string(),
            _ => list.to_string(),
        }
    }
}

fn side_by_side(left: &str, right: &str, left_width: usize) -> String {
    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.lines().collect();
    let rows = left.len().max(right.len());

    let mut buf = String::new();
    for i in 0..rows {
        let l = left.get(i).copied().unwrap_or("");
        let r = right.get(i).copied().unwrap_or("");
        let pad = left_width.saturating_sub(l.chars().count());
        buf.push_str(l);
        buf.push_str(&" ".repeat(pad));
        buf.push_str(SEPARATOR);
        buf.push_str(r);
        buf.push('\n');
    }
    buf
}
