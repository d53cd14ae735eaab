pub mod sinpe;
