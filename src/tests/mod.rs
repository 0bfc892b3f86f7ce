mod codec_selection;
