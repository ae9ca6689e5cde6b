use crate::{
    color::Color,
    compose::{NodeContent, Scene, SceneNode},
    geometry::Rect,
    style::ShadowStyle,
};

/// Two independent FNV lanes over the full scene tree. Used by tests and the
/// CLI to check that composition stayed deterministic without storing whole
/// trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for SceneFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub fn scene_fingerprint(scene: &Scene) -> SceneFingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_f64_pair(&mut a, &mut b, scene.canvas.width);
    write_f64_pair(&mut a, &mut b, scene.canvas.height);
    write_color_pair(&mut a, &mut b, scene.canvas.fill);

    match &scene.background {
        Some(bg) => {
            write_u8_pair(&mut a, &mut b, 1);
            write_str_pair(&mut a, &mut b, &bg.url);
            write_u8_pair(&mut a, &mut b, u8::from(bg.video));
            write_rect_pair(&mut a, &mut b, bg.rect);
            write_u8_pair(&mut a, &mut b, u8::from(bg.missing));
        }
        None => write_u8_pair(&mut a, &mut b, 0),
    }

    write_nodes(&mut a, &mut b, &scene.nodes);

    SceneFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_nodes(a: &mut Fnv1a64, b: &mut Fnv1a64, nodes: &[SceneNode]) {
    write_u64_pair(a, b, nodes.len() as u64);
    for node in nodes {
        write_rect_pair(a, b, node.rect);
        write_i64_pair(a, b, i64::from(node.z));
        write_content(a, b, &node.content);
        write_nodes(a, b, &node.children);
    }
}

fn write_content(a: &mut Fnv1a64, b: &mut Fnv1a64, content: &NodeContent) {
    match content {
        NodeContent::Text(t) => {
            write_u8_pair(a, b, 0);
            write_str_pair(a, b, &t.text);
            write_color_pair(a, b, t.color);
            write_str_pair(a, b, &t.font_url);
            write_u64_pair(a, b, u64::from(t.size));
            let deco = u8::from(t.decoration.bold)
                | u8::from(t.decoration.italic) << 1
                | u8::from(t.decoration.underline) << 2;
            write_u8_pair(a, b, deco);
            write_shadow_pair(a, b, t.shadow);
        }
        NodeContent::Panel(p) => {
            write_u8_pair(a, b, 1);
            write_color_pair(a, b, p.color);
            write_f64_pair(a, b, p.opacity);
            write_u64_pair(a, b, u64::from(p.blur));
            write_f64_pair(a, b, p.radius);
        }
        NodeContent::Image(img) => {
            write_u8_pair(a, b, 2);
            write_str_pair(a, b, &img.url);
            write_u8_pair(a, b, u8::from(img.missing));
        }
        NodeContent::Placeholder { label } => {
            write_u8_pair(a, b, 3);
            write_str_pair(a, b, label);
        }
        NodeContent::Highlight => write_u8_pair(a, b, 4),
        NodeContent::Handle => write_u8_pair(a, b, 5),
    }
}

fn write_shadow_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, shadow: Option<ShadowStyle>) {
    match shadow {
        Some(s) => {
            write_u8_pair(a, b, 1);
            write_color_pair(a, b, s.color);
            write_i64_pair(a, b, i64::from(s.offset_x));
            write_i64_pair(a, b, i64::from(s.offset_y));
            write_u64_pair(a, b, u64::from(s.radius));
        }
        None => write_u8_pair(a, b, 0),
    }
}

fn write_rect_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, rect: Rect) {
    write_f64_pair(a, b, rect.x0);
    write_f64_pair(a, b, rect.y0);
    write_f64_pair(a, b, rect.x1);
    write_f64_pair(a, b, rect.y1);
}

fn write_color_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, color: Color) {
    a.write_bytes(&[color.r, color.g, color.b]);
    b.write_bytes(&[color.r, color.g, color.b]);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    write_u64_pair(a, b, v.to_bits());
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_i64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: i64) {
    write_u64_pair(a, b, v as u64);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}
