pub mod fake_azcopy;
