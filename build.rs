extern crate gl_generator;

use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};
use std::env;
use std::fs::File;
use std::path::Path;

// The benchmarked submission paths (glBegin/glEnd, display lists, client
// arrays, glDrawPixels) only exist in the compatibility profile, so the
// bindings are generated here instead of using a pregenerated core-profile
// crate.
fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let mut file = File::create(&Path::new(&dest).join("gl_bindings.rs")).unwrap();

    Registry::new(
        Api::Gl,
        (2, 1),
        Profile::Compatibility,
        Fallbacks::All,
        [
            "GL_ARB_vertex_buffer_object",
            "GL_EXT_compiled_vertex_array",
        ],
    )
    .write_bindings(GlobalGenerator, &mut file)
    .unwrap();
}
