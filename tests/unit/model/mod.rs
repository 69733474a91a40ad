mod combined;
mod presets;
