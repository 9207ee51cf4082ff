use anyhow::Result;

use gl;
use gl::types::*;
use glutil;
use result::{ResultDesc, ResultSet};
use test::Test;

pub static UPLOAD_DESCS: &[ResultDesc] = &[
    ResultDesc::new("TexelRate", "texel/s"),
    ResultDesc::new("DataRate", "byte/s"),
];

/// glTexImage2D re-upload of an RGBA image every iteration. Width and height
/// are settable through the property interface; the channel type is fixed at
/// construction because it changes the bytes-per-texel accounting.
pub struct TextureUploadTest {
    name: &'static str,
    width: usize,
    height: usize,
    channel_type: GLenum,
    texture: GLuint,
    buffer: Vec<u8>,
}

impl TextureUploadTest {
    pub fn new(name: &'static str, channel_type: GLenum) -> TextureUploadTest {
        TextureUploadTest {
            name: name,
            width: 256,
            height: 256,
            channel_type: channel_type,
            texture: 0,
            buffer: Vec::new(),
        }
    }
}

impl Test for TextureUploadTest {
    fn name(&self) -> &str {
        self.name
    }

    fn descs(&self) -> &'static [ResultDesc] {
        UPLOAD_DESCS
    }

    fn set_property(&mut self, key: &str, value: u64) -> Result<()> {
        match key {
            "Width" => self.width = value as usize,
            "Height" => self.height = value as usize,
            _ => bail!("{}: unknown property '{}'", self.name, key),
        }
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let size = self.width * self.height * 4 * glutil::type_size(self.channel_type);
        self.buffer.resize(size, 0);
        unsafe {
            gl::GenTextures(1, &mut self.texture);
        }
        Ok(())
    }

    fn iterate(&mut self, results: &mut ResultSet) -> Result<()> {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.texture);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                self.width as GLsizei,
                self.height as GLsizei,
                0,
                gl::RGBA,
                self.channel_type,
                self.buffer.as_ptr() as *const GLvoid,
            );
        }
        results[0] += (self.width * self.height) as f64;
        results[1] += self.buffer.len() as f64;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        unsafe {
            gl::DeleteTextures(1, &self.texture);
        }
        self.texture = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test::Test;

    #[test]
    fn dimensions_arrive_through_the_property_interface() {
        let mut test = TextureUploadTest::new("Upload 512x512 u8", gl::UNSIGNED_BYTE);
        test.set_property("Width", 512).unwrap();
        test.set_property("Height", 512).unwrap();
        assert!(test.set_property("Depth", 4).is_err());
        assert_eq!(test.name(), "Upload 512x512 u8");
        assert_eq!(test.descs().len(), 2);
    }
}
