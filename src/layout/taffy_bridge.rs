//! Taffy Bridge - Page layout through the Taffy flexbox engine.
//!
//! The page is one flex column; each section is a leaf whose height is its
//! content rows (at least `min_rows`). Sections never shrink, so the column
//! grows past the viewport and becomes the scrollable content.

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, NodeId, Size, Style,
    TaffyTree,
};

use crate::error::LayoutError;

use super::types::ComputedLayout;

/// One section of the page, as the layout sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNode {
    /// Reveal target the section is mounted as.
    pub target: usize,
    /// Rows the section content needs.
    pub rows: u16,
    /// Minimum height (e.g. a full screen for the hero).
    pub min_rows: u16,
}

impl PageNode {
    pub const fn new(target: usize, rows: u16) -> Self {
        Self {
            target,
            rows,
            min_rows: 0,
        }
    }

    pub const fn with_min_rows(mut self, min_rows: u16) -> Self {
        self.min_rows = min_rows;
        self
    }
}

fn section_style(node: &PageNode) -> Style {
    Style {
        flex_shrink: 0.0,
        size: Size {
            width: Dimension::Percent(1.0),
            height: Dimension::Length(node.rows as f32),
        },
        min_size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(node.min_rows as f32),
        },
        ..Default::default()
    }
}

fn page_style(width: u16, gap: u16) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: Size {
            width: Dimension::Length(width as f32),
            height: Dimension::Auto,
        },
        gap: Size {
            width: LengthPercentage::Length(0.0),
            height: LengthPercentage::Length(gap as f32),
        },
        ..Default::default()
    }
}

/// Compute the page layout for `nodes`, stacked top to bottom in order.
///
/// # Arguments
///
/// * `nodes` - Sections in page order
/// * `width` - Page width in columns
/// * `gap` - Blank rows between sections
pub fn compute_page_layout(
    nodes: &[PageNode],
    width: u16,
    gap: u16,
) -> Result<ComputedLayout, LayoutError> {
    if nodes.is_empty() {
        return Ok(ComputedLayout::new());
    }

    let array_size = nodes.iter().map(|n| n.target).max().unwrap_or(0) + 1;
    let mut result = ComputedLayout::with_capacity(array_size);

    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut children: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for node in nodes {
        children.push(tree.new_leaf(section_style(node))?);
    }
    let root = tree.new_with_children(page_style(width, gap), &children)?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    for (node, &child) in nodes.iter().zip(&children) {
        let layout = tree.layout(child)?;
        let idx = node.target;
        result.x[idx] = layout.location.x.round().max(0.0) as u16;
        result.y[idx] = layout.location.y.round().max(0.0) as u16;
        result.width[idx] = layout.size.width.round().max(0.0) as u16;
        result.height[idx] = layout.size.height.round().max(0.0) as u16;
    }

    result.content_height = tree.layout(root)?.size.height.round().max(0.0) as u16;

    Ok(result)
}
