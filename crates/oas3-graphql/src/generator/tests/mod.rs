mod composition;
mod sdl;
mod support;
mod visit;
