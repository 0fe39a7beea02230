mod proving;
