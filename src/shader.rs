//! GLSL sources for the edge blur program
//!
//! The fragment stage is `field::evaluate` written in GLSL ES 1.00. Colors and
//! the blur width come from the Rust constants through a generated `#define`
//! block, so the GPU and CPU paths always agree on them.

use crate::field::{Color, BACKGROUND_COLOR, BLUR_EDGE, FOREGROUND_COLOR};

/// Vertex attribute carrying the quad corners
pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Uniforms the fragment stage reads
pub const UNIFORM_SIZE: &str = "size";
pub const UNIFORM_POS: &str = "pos";
pub const UNIFORM_BLUR: &str = "blur";
pub const UNIFORMS: [&str; 3] = [UNIFORM_SIZE, UNIFORM_POS, UNIFORM_BLUR];

pub const VERTEX_SHADER: &str = r#"#version 100
attribute vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

const FRAGMENT_BODY: &str = r#"
uniform vec2 size;
uniform vec2 pos;
uniform float blur;

bool rect_contains_point(vec2 point, vec2 pos, vec2 size) {
    return pos.x <= point.x && point.x < pos.x + size.x
        && pos.y <= point.y && point.y < pos.y + size.y;
}

void main() {
    vec2 point = gl_FragCoord.xy;

    if (rect_contains_point(point, pos, size)) {
        gl_FragColor = FOREGROUND_COLOR;
        return;
    }

    float width = blur * BLUR_EDGE;
    float edge;

    if (pos.x <= point.x && point.x < pos.x + size.x) {
        edge = min(abs(point.y - pos.y), abs(point.y - (pos.y + size.y)));
    } else if (pos.y <= point.y && point.y < pos.y + size.y) {
        edge = min(abs(point.x - pos.x), abs(point.x - (pos.x + size.x)));
    } else {
        edge = length(point - pos);
        edge = min(edge, length(point - (pos + vec2(size.x, 0.0))));
        edge = min(edge, length(point - (pos + vec2(0.0, size.y))));
        edge = min(edge, length(point - (pos + size)));
    }

    if (edge < width) {
        gl_FragColor = mix(FOREGROUND_COLOR, BACKGROUND_COLOR, smoothstep(0.0, width, edge));
    } else {
        gl_FragColor = BACKGROUND_COLOR;
    }
}
"#;

fn vec4_literal(c: Color) -> String {
    format!("vec4({:?}, {:?}, {:?}, {:?})", c[0], c[1], c[2], c[3])
}

/// Full fragment shader source, constants included
pub fn fragment_shader() -> String {
    format!(
        "#version 100\n\
         precision highp float;\n\
         \n\
         #define FOREGROUND_COLOR {}\n\
         #define BACKGROUND_COLOR {}\n\
         #define BLUR_EDGE {:?}\n\
         {}",
        vec4_literal(FOREGROUND_COLOR),
        vec4_literal(BACKGROUND_COLOR),
        BLUR_EDGE,
        FRAGMENT_BODY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_follow_rust_constants() {
        let src = fragment_shader();
        assert!(src.starts_with("#version 100\n"));
        assert!(src.contains("#define FOREGROUND_COLOR vec4(1.0, 1.0, 0.0, 1.0)\n"));
        assert!(src.contains("#define BACKGROUND_COLOR vec4(0.0, 0.0, 0.0, 1.0)\n"));
        assert!(src.contains("#define BLUR_EDGE 50.0\n"));
    }

    #[test]
    fn declares_every_uniform() {
        let src = fragment_shader();
        for name in UNIFORMS {
            assert!(
                src.lines().any(|l| l.trim().starts_with("uniform") && l.trim_end().ends_with(&format!(" {name};"))),
                "missing uniform {name}"
            );
        }
    }

    #[test]
    fn vertex_stage_reads_position_attribute() {
        assert!(VERTEX_SHADER.contains(&format!("attribute vec2 {POSITION_ATTRIBUTE};")));
    }
}
