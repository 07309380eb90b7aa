use crate::ShoppingList;

pub const TITLE: &str = "Shopping List";
pub const EMPTY_MESSAGE: &str = "Shopping List is empty. Add some recipes to shopping cart:)";

/// A line of text at a fixed position, in PDF points from the bottom left.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub index: usize,
    pub lines: Vec<PlacedLine>,
}

/// Page geometry of the shopping list document, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub page_width: f32,
    pub page_height: f32,
    pub font_size: f32,
    pub heading_x: f32,
    pub heading_y: f32,
    pub item_x: f32,
    pub first_item_y: f32,
    pub line_height: f32,
    pub bottom: f32,
    pub continuation_top: f32,
}

impl Default for Layout {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            font_size: 12.0,
            heading_x: 75.0,
            heading_y: 740.0,
            item_x: 100.0,
            first_item_y: 700.0,
            line_height: 20.0,
            bottom: 100.0,
            continuation_top: 740.0,
        }
    }
}

enum State {
    PageOpen,
    PageClosing,
    Done,
}

impl Layout {
    /// Places the list on pages. Pure: the same list always yields the same
    /// pages, and a page is only opened when a line remains to be written.
    pub fn paginate(&self, list: &ShoppingList) -> Vec<RenderedPage> {
        if list.is_empty() {
            return vec![RenderedPage {
                index: 0,
                lines: vec![PlacedLine {
                    x: self.heading_x,
                    y: self.heading_y,
                    text: EMPTY_MESSAGE.to_owned(),
                }],
            }];
        }

        let mut pages = Vec::new();
        let mut page = RenderedPage {
            index: 0,
            lines: vec![PlacedLine {
                x: self.heading_x,
                y: self.heading_y,
                text: TITLE.to_owned(),
            }],
        };
        let mut cursor = self.first_item_y;
        let mut items = list.items().iter().peekable();
        let mut state = State::PageOpen;

        loop {
            state = match state {
                State::PageOpen => match items.next() {
                    Some(item) => {
                        page.lines.push(PlacedLine {
                            x: self.item_x,
                            y: cursor,
                            text: item.line(),
                        });
                        cursor -= self.line_height;

                        if cursor <= self.bottom {
                            State::PageClosing
                        } else {
                            State::PageOpen
                        }
                    }
                    None => State::PageClosing,
                },
                State::PageClosing => {
                    let index = page.index + 1;
                    pages.push(std::mem::replace(
                        &mut page,
                        RenderedPage {
                            index,
                            lines: vec![],
                        },
                    ));

                    if items.peek().is_some() {
                        cursor = self.continuation_top;
                        State::PageOpen
                    } else {
                        State::Done
                    }
                }
                State::Done => break,
            };
        }

        pages
    }
}

/// [`Layout::paginate`] with the default A4 layout.
pub fn paginate(list: &ShoppingList) -> Vec<RenderedPage> {
    Layout::default().paginate(list)
}
