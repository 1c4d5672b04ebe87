pub mod cutfreq;
pub mod kd_tree;
pub mod maxlevel;
pub mod resize;
