//! OpenGL bindings, generated by the build script for the 2.1 compatibility
//! profile plus the compiled-vertex-array and VBO extensions.

#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(dead_code)]

include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
