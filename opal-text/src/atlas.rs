//! Shelf packing of glyph bitmaps into a single atlas image.

/// Placement of one packed rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct AtlasSlot {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The result of packing: final image size plus one slot per input
/// rectangle, in input order.
#[derive(Clone, Debug)]
pub(crate) struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub slots: Vec<AtlasSlot>,
}

/// One-pixel gutter between packed rectangles, so linear sampling never
/// bleeds across glyphs.
const GUTTER: u32 = 1;

const MIN_WIDTH: u32 = 64;

fn next_pow2(v: u32) -> u32 {
    v.max(1).next_power_of_two()
}

/// Packs rectangles left to right into shelves. The atlas width is a
/// power of two estimated from the total input area; rows open whenever a
/// rectangle does not fit the current shelf. Deterministic for a given
/// input sequence (input order is preserved, nothing is sorted).
pub(crate) fn pack(sizes: &[(u32, u32)]) -> AtlasLayout {
    let total_area: u64 = sizes
        .iter()
        .map(|&(w, h)| ((w + GUTTER) as u64) * ((h + GUTTER) as u64))
        .sum();
    let widest = sizes.iter().map(|&(w, _)| w + GUTTER).max().unwrap_or(0);
    let width = next_pow2(((total_area as f64).sqrt().ceil() as u32).max(widest).max(MIN_WIDTH));

    let mut slots = Vec::with_capacity(sizes.len());
    let mut cursor_x = GUTTER;
    let mut cursor_y = GUTTER;
    let mut shelf_height = 0;

    for &(w, h) in sizes {
        if cursor_x + w + GUTTER > width {
            cursor_x = GUTTER;
            cursor_y += shelf_height + GUTTER;
            shelf_height = 0;
        }
        slots.push(AtlasSlot {
            x: cursor_x,
            y: cursor_y,
            width: w,
            height: h,
        });
        cursor_x += w + GUTTER;
        shelf_height = shelf_height.max(h);
    }

    let height = next_pow2(cursor_y + shelf_height + GUTTER);
    AtlasLayout {
        width,
        height,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: &AtlasSlot, b: &AtlasSlot) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn slots_stay_inside_and_disjoint() {
        let sizes: Vec<(u32, u32)> = (0..60).map(|i| (4 + (i % 13), 6 + (i % 7))).collect();
        let layout = pack(&sizes);
        assert_eq!(layout.slots.len(), sizes.len());
        for (slot, &(w, h)) in layout.slots.iter().zip(&sizes) {
            assert_eq!((slot.width, slot.height), (w, h));
            assert!(slot.x + slot.width <= layout.width);
            assert!(slot.y + slot.height <= layout.height);
        }
        for (i, a) in layout.slots.iter().enumerate() {
            for b in &layout.slots[i + 1..] {
                assert!(!overlaps(a, b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn packing_is_deterministic() {
        let sizes = [(10, 12), (3, 3), (30, 8), (7, 20)];
        let a = pack(&sizes);
        let b = pack(&sizes);
        assert_eq!(a.slots, b.slots);
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert!(a.width.is_power_of_two() && a.height.is_power_of_two());
    }

    #[test]
    fn empty_input_yields_minimal_atlas() {
        let layout = pack(&[]);
        assert!(layout.slots.is_empty());
        assert_eq!(layout.width, MIN_WIDTH);
    }
}
