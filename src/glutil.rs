//! Small helpers over the raw bindings.

use std::ffi::CStr;

use gl;
use gl::types::*;

pub unsafe fn set_enabled(cap: GLenum, enabled: bool) {
    if enabled {
        gl::Enable(cap);
    } else {
        gl::Disable(cap);
    }
}

/// Checks the extension string of the current context.
pub fn has_extension(name: &str) -> bool {
    unsafe {
        let extensions = gl::GetString(gl::EXTENSIONS);
        if extensions.is_null() {
            return false;
        }
        let extensions = CStr::from_ptr(extensions as *const _);
        extensions
            .to_string_lossy()
            .split(' ')
            .any(|ext| ext == name)
    }
}

pub fn renderer_name() -> String {
    unsafe {
        let renderer = gl::GetString(gl::RENDERER);
        if renderer.is_null() {
            return String::from("unknown");
        }
        CStr::from_ptr(renderer as *const _)
            .to_string_lossy()
            .into_owned()
    }
}

/// Byte size of one element of a pixel-channel type.
pub fn type_size(type_constant: GLenum) -> usize {
    match type_constant {
        gl::UNSIGNED_BYTE | gl::BYTE => 1,
        gl::UNSIGNED_SHORT | gl::SHORT => 2,
        gl::UNSIGNED_INT | gl::INT | gl::FLOAT => 4,
        _ => panic!("invalid channel type: 0x{:x}", type_constant),
    }
}

/// Column-major translation matrix for glLoadMatrixf.
pub fn translation(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        x, y, z, 1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl;

    #[test]
    fn channel_type_sizes() {
        assert_eq!(type_size(gl::UNSIGNED_BYTE), 1);
        assert_eq!(type_size(gl::SHORT), 2);
        assert_eq!(type_size(gl::FLOAT), 4);
    }

    #[test]
    fn translation_lands_in_the_fourth_column() {
        let m = translation(3.0, 4.0, 5.0);
        assert_eq!(&m[12..15], &[3.0, 4.0, 5.0]);
        assert_eq!(m[0], 1.0);
        assert_eq!(m[5], 1.0);
        assert_eq!(m[10], 1.0);
        assert_eq!(m[15], 1.0);
    }
}
