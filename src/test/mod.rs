mod emu_export;
mod fat_tree;
