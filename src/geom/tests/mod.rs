mod test_surface_sampling;
