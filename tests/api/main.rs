mod test_projects;
