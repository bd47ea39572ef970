//! Distributing the line stream across fixed-capacity pages

use crate::document::PageStyle;
use crate::layout::assembly::LineWithMetadata;
use crate::layout::config::LayoutConfig;
use crate::render::{CanvasLine, CanvasPage, LayoutResult};

/// Number of pages needed for `line_count` lines
pub fn page_count(line_count: usize, max_lines_per_page: usize) -> usize {
    line_count.div_ceil(max_lines_per_page.max(1))
}

/// Pack lines onto pages of `config.max_lines_per_page()` lines each.
///
/// Zero lines give zero pages; only the last page may be under capacity.
pub fn paginate(lines: &[LineWithMetadata], config: &LayoutConfig, style: PageStyle) -> LayoutResult {
    let max_lines = config.max_lines_per_page();
    let mut pages = Vec::with_capacity(page_count(lines.len(), max_lines));
    let mut current_page = CanvasPage::new(1, style);

    for line in lines {
        if current_page.lines.len() >= max_lines {
            // Finalize current page
            let next_number = current_page.page_number + 1;
            pages.push(std::mem::replace(
                &mut current_page,
                CanvasPage::new(next_number, style),
            ));
        }

        let index = current_page.lines.len();
        current_page.lines.push(CanvasLine {
            text: line.text.clone(),
            x: config.margin_left,
            y: config.margin_top + index as f32 * config.line_height,
            font_size: config.font_size,
        });
    }

    // Finalize last page
    if !current_page.lines.is_empty() {
        pages.push(current_page);
    }

    LayoutResult::new(pages, lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::assembly::assemble_lines;

    fn config(max_lines: usize) -> LayoutConfig {
        LayoutConfig {
            page_width: 200.0,
            page_height: 20.0 + max_lines as f32 * 10.0,
            margin_top: 10.0,
            margin_bottom: 10.0,
            margin_left: 5.0,
            margin_right: 5.0,
            line_height: 10.0,
            font_size: 8.0,
            answer_spacing: 0,
        }
    }

    fn stream(count: usize) -> Vec<LineWithMetadata> {
        let texts = (0..count).map(|i| format!("line {i}")).collect();
        assemble_lines(vec![(1, texts)], 0)
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn test_no_lines_no_pages() {
        let result = paginate(&[], &config(3), PageStyle::Ruled);
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.total_lines, 0);
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_fills_pages_in_order() {
        let result = paginate(&stream(7), &config(3), PageStyle::Lined);

        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_lines, 7);
        let counts: Vec<_> = result.pages.iter().map(|p| p.lines.len()).collect();
        assert_eq!(counts, [3, 3, 1]);

        let numbers: Vec<_> = result.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert!(result.pages.iter().all(|p| p.style == PageStyle::Lined));

        assert_eq!(result.pages[1].lines[0].text, "line 3");
        assert_eq!(result.pages[2].lines[0].text, "line 6");
    }

    #[test]
    fn test_line_positions_restart_per_page() {
        let result = paginate(&stream(4), &config(2), PageStyle::Ruled);

        for page in &result.pages {
            let ys: Vec<_> = page.lines.iter().map(|l| l.y).collect();
            assert_eq!(ys, [10.0, 20.0]);
            assert!(page.lines.iter().all(|l| l.x == 5.0 && l.font_size == 8.0));
        }
    }

    #[test]
    fn test_degenerate_config_one_line_per_page() {
        let degenerate = LayoutConfig {
            page_height: 10.0,
            margin_top: 40.0,
            margin_bottom: 40.0,
            ..config(1)
        };
        let result = paginate(&stream(3), &degenerate, PageStyle::Unruled);
        assert_eq!(result.total_pages, 3);
        assert!(result.pages.iter().all(|p| p.lines.len() == 1));
    }
}
