use chipbox_core::platform::{PlatformError, Screen};
use chipbox_core::video::Frame;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// Open a centered window of exactly `size` pixels with a renderer on it.
pub fn open_window(
    sdl_video: &sdl2::VideoSubsystem,
    title: &str,
    size: (u32, u32),
) -> Result<Canvas<Window>, PlatformError> {
    let window = sdl_video
        .window(title, size.0, size.1)
        .position_centered()
        .build()
        .map_err(|e| PlatformError::Init(e.to_string()))?;

    // No vsync: the host loop polls without sleeping and paces itself
    // from the clock.
    window
        .into_canvas()
        .accelerated()
        .build()
        .map_err(|e| PlatformError::Init(e.to_string()))
}

/// Fixed-size SDL window backed by one streaming texture.
///
/// Frames are uploaded once, on blit. Presenting only copies the texture
/// that is already on the GPU.
pub struct SdlScreen<'a> {
    canvas: Canvas<Window>,
    texture: Texture<'a>,
    size: (u32, u32),
    has_frame: bool,
}

impl<'a> SdlScreen<'a> {
    pub fn new(
        canvas: Canvas<Window>,
        texture_creator: &'a TextureCreator<WindowContext>,
    ) -> Result<Self, PlatformError> {
        let size = canvas.window().size();
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, size.0, size.1)
            .map_err(|e| PlatformError::Init(e.to_string()))?;

        Ok(Self {
            canvas,
            texture,
            size,
            has_frame: false,
        })
    }
}

impl Screen for SdlScreen<'_> {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn blit(&mut self, frame: &Frame) -> Result<(), PlatformError> {
        check_frame_size(frame, self.size)?;
        self.texture
            .update(None, &frame.pixels, frame.pitch())
            .map_err(|e| PlatformError::Video(e.to_string()))?;
        self.has_frame = true;
        Ok(())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.canvas.clear();
        if self.has_frame {
            self.canvas
                .copy(&self.texture, None, None)
                .map_err(PlatformError::Video)?;
        }
        self.canvas.present();
        Ok(())
    }
}

/// The texture is allocated once at window size; frames must match it.
fn check_frame_size(frame: &Frame, size: (u32, u32)) -> Result<(), PlatformError> {
    let expected_len = frame.pitch() * size.1 as usize;
    if (frame.width, frame.height) == size && frame.pixels.len() == expected_len {
        Ok(())
    } else {
        Err(PlatformError::Video(format!(
            "frame is {}x{}, screen is {}x{}",
            frame.width, frame.height, size.0, size.1
        )))
    }
}
