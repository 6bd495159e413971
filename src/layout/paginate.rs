//! Page breaking.
//!
//! Blocks are placed top to bottom with a per-page cursor. A block and its
//! sub-blocks form one group that is never split across pages, and a date
//! divider is kept on the same page as the group after it. A group taller
//! than a whole page still gets placed on a fresh page and overflows it.

use super::LayoutOptions;
use crate::error::Warning;
use crate::model::{Alignment, LayoutBlock, PageBuilder};

/// Pages filled by the engine, not yet finalized.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Pages in order, at least one
    pub pages: Vec<PageBuilder>,
    /// Overflow warnings
    pub warnings: Vec<Warning>,
}

impl Pagination {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Places blocks onto pages.
pub struct PaginationEngine<'a> {
    options: &'a LayoutOptions,
}

impl<'a> PaginationEngine<'a> {
    /// Create an engine for the given geometry.
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Lay out blocks in order.
    ///
    /// Always returns at least one page, even for no blocks.
    pub fn layout<I>(&self, blocks: I) -> Pagination
    where
        I: IntoIterator<Item = LayoutBlock>,
    {
        let opts = self.options;
        let mut pages = Vec::new();
        let mut page = self.new_page(1);
        let mut warnings = Vec::new();
        let mut blocks = blocks.into_iter().enumerate().peekable();
        // set while the last group placed on this page is a divider
        let mut after_divider = false;

        while let Some((group, block)) = blocks.next() {
            let height = block.group_height(opts.sub_block_gap);
            let mut needed = height;
            if block.is_divider() {
                if let Some((_, next)) = blocks.peek() {
                    needed += opts.inter_block_spacing + next.group_height(opts.sub_block_gap);
                }
            }

            // the divider already broke for this group if it had to
            if !page.fits(needed) && !page.is_empty() && !after_divider {
                let number = page.number() + 1;
                log::debug!("page break before group {} (page {})", group, number);
                pages.push(std::mem::replace(&mut page, self.new_page(number)));
            }

            if !page.fits(height) {
                let warning = Warning::OversizedBlock {
                    page: page.number(),
                    height,
                    usable: page.usable_height(),
                };
                warning.log();
                warnings.push(warning);
            }

            after_divider = block.is_divider();
            self.place_group(&mut page, block, group);
            page.advance(opts.inter_block_spacing);
        }
        pages.push(page);

        log::debug!("laid out {} pages", pages.len());
        Pagination { pages, warnings }
    }

    /// Place a block, then its sub-blocks directly below it.
    fn place_group(&self, page: &mut PageBuilder, mut block: LayoutBlock, group: usize) {
        let sub_blocks = std::mem::take(&mut block.sub_blocks);
        let x = self.x_for(&block);
        page.place(x, block, group);

        for sub in sub_blocks {
            page.advance(self.options.sub_block_gap);
            self.place_group(page, sub, group);
        }
    }

    /// Left edge for a block's alignment.
    pub fn x_for(&self, block: &LayoutBlock) -> f32 {
        match block.alignment {
            Alignment::Left => self.options.left_margin,
            Alignment::Right => self.options.page_width - self.options.right_margin - block.width,
        }
    }

    fn new_page(&self, number: u32) -> PageBuilder {
        PageBuilder::new(
            number,
            self.options.page_width,
            self.options.page_height,
            self.options.content_top(number),
            self.options.content_bottom(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockBody;

    fn options() -> LayoutOptions {
        LayoutOptions::new()
            .with_page_size(210.0, 100.0)
            .with_margins(10.0, 15.0, 10.0, 15.0)
            .with_header_height(0.0)
            .with_footer_height(5.0)
            .with_spacing(2.0)
            .with_sub_block_gap(1.0)
    }

    fn bubble(height: f32, alignment: Alignment) -> LayoutBlock {
        LayoutBlock::new(
            BlockBody::Call { lines: Vec::new() },
            alignment,
            50.0,
            height,
        )
    }

    fn divider() -> LayoutBlock {
        LayoutBlock::new(
            BlockBody::Divider {
                label: "Monday, January 1, 2024".to_string(),
            },
            Alignment::Left,
            180.0,
            10.0,
        )
    }

    #[test]
    fn test_empty_input_gives_one_page() {
        let opts = options();
        let result = PaginationEngine::new(&opts).layout(Vec::new());
        assert_eq!(result.page_count(), 1);
        assert!(result.pages[0].is_empty());
    }

    #[test]
    fn test_break_when_block_does_not_fit() {
        let opts = options();
        // usable height 80: 30 + 2 + 30 + 2 = 64, a third block of 30 breaks
        let blocks = vec![
            bubble(30.0, Alignment::Left),
            bubble(30.0, Alignment::Right),
            bubble(30.0, Alignment::Left),
        ];
        let result = PaginationEngine::new(&opts).layout(blocks);
        assert_eq!(result.page_count(), 2);
        assert_eq!(result.pages[0].blocks().len(), 2);
        assert_eq!(result.pages[1].blocks()[0].y, 10.0);
        assert_eq!(result.pages[0].blocks()[1].x, 210.0 - 15.0 - 50.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_group_kept_together() {
        let opts = options();
        let with_media = bubble(20.0, Alignment::Right).with_sub_block(bubble(30.0, Alignment::Right));
        let blocks = vec![bubble(40.0, Alignment::Left), with_media];
        let result = PaginationEngine::new(&opts).layout(blocks);

        // 40 + 2 leaves 38, the group needs 20 + 1 + 30
        assert_eq!(result.page_count(), 2);
        let second = result.pages[1].blocks();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].group, second[1].group);
        assert_eq!(second[1].y, second[0].bottom() + 1.0);
        assert!(second[0].block.sub_blocks.is_empty());
    }

    #[test]
    fn test_divider_kept_with_next() {
        let opts = options();
        let blocks = vec![bubble(50.0, Alignment::Left), divider(), bubble(20.0, Alignment::Left)];
        let result = PaginationEngine::new(&opts).layout(blocks);

        // the divider alone would fit after the first block, the pair does not
        assert_eq!(result.page_count(), 2);
        assert_eq!(result.pages[0].blocks().len(), 1);
        assert!(result.pages[1].blocks()[0].block.is_divider());
    }

    #[test]
    fn test_oversized_block_overflows_with_warning() {
        let opts = options();
        let blocks = vec![bubble(10.0, Alignment::Left), bubble(120.0, Alignment::Left)];
        let result = PaginationEngine::new(&opts).layout(blocks);

        assert_eq!(result.page_count(), 2);
        assert_eq!(result.pages[1].blocks()[0].y, 10.0);
        assert_eq!(
            result.warnings,
            vec![Warning::OversizedBlock {
                page: 2,
                height: 120.0,
                usable: 80.0
            }]
        );
    }

    #[test]
    fn test_divider_kept_with_oversized_next() {
        let opts = options();
        let blocks = vec![bubble(20.0, Alignment::Left), divider(), bubble(200.0, Alignment::Left)];
        let result = PaginationEngine::new(&opts).layout(blocks);

        assert_eq!(result.page_count(), 2);
        let second = result.pages[1].blocks();
        assert_eq!(second.len(), 2);
        assert!(second[0].block.is_divider());
        assert_eq!(second[0].y, 10.0);
        assert_eq!(second[1].block.height, 200.0);
        assert!(matches!(
            result.warnings.as_slice(),
            [Warning::OversizedBlock { page: 2, .. }]
        ));
    }

    #[test]
    fn test_no_overlap_and_cursor_within_limit() {
        let opts = options();
        let blocks: Vec<LayoutBlock> = (0..40)
            .map(|i| bubble(5.0 + (i % 7) as f32 * 3.0, Alignment::Left))
            .collect();
        let result = PaginationEngine::new(&opts).layout(blocks);

        for page in &result.pages {
            assert!(page.cursor_y() <= page.limit_y());
            for pair in page.blocks().windows(2) {
                assert!(!pair[0].overlaps_vertically(&pair[1]));
            }
            for placed in page.blocks() {
                assert!(placed.bottom() <= page.limit_y());
            }
        }
    }
}
