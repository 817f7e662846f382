pub mod hit;
pub mod paint;

pub use hit::{hit_test, hit_test_rect};
pub use paint::{PaintTheme, paint_draw_list};
